mod app;
mod feed;
mod util;

use std::time::Duration;

use clap::Parser;

use feed::SnapshotSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Dashboard endpoint (base URL) or a local snapshot JSON file
    #[arg(long)]
    source: String,

    /// Question id, appended to a base URL as /api/dashboard/{id}
    #[arg(long)]
    question_id: Option<String>,

    /// Snapshot poll interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = SnapshotSource::parse(&args.source, args.question_id.as_deref());
    let interval = Duration::from_millis(args.interval_ms.max(100));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "consensus-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::ConsensusApp::new(cc, source, interval)))),
    )
}
