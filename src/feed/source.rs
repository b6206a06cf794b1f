use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use super::snapshot::{Suggestion, parse_snapshot};

pub type PollResult = Result<Vec<Suggestion>, String>;

const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub enum SnapshotSource {
    Http { url: String },
    File { path: PathBuf },
}

impl SnapshotSource {
    pub fn parse(raw: &str, question_id: Option<&str>) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = match question_id {
                Some(id) => format!("{}/api/dashboard/{id}", raw.trim_end_matches('/')),
                None => raw.to_owned(),
            };
            Self::Http { url }
        } else {
            Self::File {
                path: PathBuf::from(raw),
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Http { url } => url.clone(),
            Self::File { path } => path.display().to_string(),
        }
    }

    fn fetch(&self, client: &reqwest::blocking::Client) -> Result<Vec<Suggestion>> {
        let raw = match self {
            Self::Http { url } => {
                let response = client
                    .get(url)
                    .send()
                    .with_context(|| format!("request to {url} failed"))?
                    .error_for_status()
                    .with_context(|| format!("{url} returned an error status"))?;
                response.text().context("failed to read response body")?
            }
            Self::File { path } => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        };

        parse_snapshot(&raw)
    }
}

pub fn spawn_poller(source: SnapshotSource, interval: Duration) -> Receiver<PollResult> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build();

        let client = match client {
            Ok(client) => client,
            Err(error) => {
                let _ = tx.send(Err(format!("failed to build http client: {error}")));
                return;
            }
        };

        loop {
            let result = source.fetch(&client).map_err(|error| format!("{error:#}"));
            if let Err(message) = &result {
                log::warn!("snapshot poll failed: {message}");
            }

            // Receiver dropped means the app shut down; stop polling.
            if tx.send(result).is_err() {
                break;
            }

            thread::sleep(interval);
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_base_plus_question_id_composes_dashboard_url() {
        let source = SnapshotSource::parse("http://localhost:8000/", Some("q-42"));
        match source {
            SnapshotSource::Http { url } => {
                assert_eq!(url, "http://localhost:8000/api/dashboard/q-42");
            }
            SnapshotSource::File { .. } => panic!("expected http source"),
        }
    }

    #[test]
    fn non_url_source_is_a_file_path() {
        let source = SnapshotSource::parse("fixtures/snapshot.json", None);
        assert!(matches!(source, SnapshotSource::File { .. }));
    }

    #[test]
    fn poller_reports_missing_file_as_recoverable_error() {
        let source = SnapshotSource::parse("/definitely/not/a/file.json", None);
        let rx = spawn_poller(source, Duration::from_secs(60));
        let first = rx.recv().expect("poller should send one result");
        assert!(first.is_err());
        drop(rx);
    }
}
