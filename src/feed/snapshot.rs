use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Good,
    Neutral,
    Bad,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Bad => "bad",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonOpinion {
    pub name: String,
    #[serde(default)]
    pub profile_pic_url: String,
    pub message: String,
    pub classification: Classification,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub title: String,
    pub size: f32,
    #[serde(default)]
    pub people_opinions: Vec<PersonOpinion>,
}

pub fn parse_snapshot(raw: &str) -> Result<Vec<Suggestion>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut suggestions: Vec<Suggestion> =
        serde_json::from_str(trimmed).context("snapshot payload is not a suggestion list")?;

    for suggestion in &mut suggestions {
        suggestion.size = suggestion.size.clamp(0.0, 1.0);
    }

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_payload() {
        let raw = r#"[
            {
                "title": "More async standups",
                "size": 0.72,
                "peopleOpinions": [
                    {
                        "name": "dana",
                        "profilePicUrl": "https://cdn.example/dana.png",
                        "message": "saves an hour a week",
                        "classification": "good"
                    }
                ]
            }
        ]"#;

        let suggestions = parse_snapshot(raw).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "More async standups");
        assert_eq!(suggestions[0].people_opinions.len(), 1);
        assert_eq!(
            suggestions[0].people_opinions[0].classification,
            Classification::Good
        );
    }

    #[test]
    fn missing_opinions_defaults_to_empty() {
        let raw = r#"[{ "title": "Quiet fridays", "size": 0.4 }]"#;
        let suggestions = parse_snapshot(raw).unwrap();
        assert!(suggestions[0].people_opinions.is_empty());
    }

    #[test]
    fn size_is_clamped_to_unit_range() {
        let raw = r#"[{ "title": "Overweight", "size": 3.5, "peopleOpinions": [] }]"#;
        let suggestions = parse_snapshot(raw).unwrap();
        assert_eq!(suggestions[0].size, 1.0);
    }

    #[test]
    fn empty_body_is_no_suggestions_yet() {
        assert!(parse_snapshot("").unwrap().is_empty());
        assert!(parse_snapshot("  \n ").unwrap().is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_snapshot("{ not json").is_err());
        assert!(parse_snapshot(r#"{"title": "an object, not a list"}"#).is_err());
    }
}
