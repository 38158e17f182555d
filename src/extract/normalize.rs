//! Result normalizer.
//!
//! The only place an [`ArticleRecord`] is built. Whatever an extractor
//! found is cleaned up here and checked against the record invariants:
//! a non-empty title, at least [`MIN_BODY_CHARS`] characters of body, and
//! a summary.

use crate::error::ExtractionError;
use crate::models::{ArticleRecord, ExtractionMethod, PublishDate};
use crate::utils::{collapse_whitespace, truncate_with_marker, truncate_for_log};
use tracing::{debug, warn};

/// Minimum body length, in characters, of a usable article.
pub const MIN_BODY_CHARS: usize = 50;

/// Characters of body used when no summary is available.
pub const SUMMARY_FALLBACK_CHARS: usize = 500;

/// Title used when no extractor found one.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Raw fields gathered by one extraction path.
#[derive(Debug, Default, Clone)]
pub struct Candidate {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publish_date: PublishDate,
    pub body_text: String,
    pub summary: Option<String>,
    pub lead_image_url: Option<String>,
}

/// Validate a candidate and turn it into an [`ArticleRecord`].
///
/// # Errors
///
/// [`ExtractionError::EmptyContent`] when the trimmed body is shorter than
/// [`MIN_BODY_CHARS`].
pub fn normalize(candidate: Candidate, method: ExtractionMethod) -> Result<ArticleRecord, ExtractionError> {
    let body_text = candidate.body_text.trim().to_string();
    let chars = body_text.chars().count();
    if chars < MIN_BODY_CHARS {
        warn!(%method, chars, min = MIN_BODY_CHARS, "Body below minimum length");
        return Err(ExtractionError::EmptyContent {
            chars,
            min: MIN_BODY_CHARS,
        });
    }

    let title = candidate
        .title
        .map(|t| collapse_whitespace(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let authors = candidate
        .authors
        .iter()
        .map(|a| collapse_whitespace(a))
        .filter(|a| !a.is_empty())
        .collect();

    let summary = candidate
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| truncate_with_marker(&body_text, SUMMARY_FALLBACK_CHARS));

    let lead_image_url = candidate
        .lead_image_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    debug!(
        %method,
        %title,
        chars,
        preview = %truncate_for_log(&body_text, 120),
        "Normalized article"
    );

    Ok(ArticleRecord {
        title,
        authors,
        publish_date: candidate.publish_date,
        body_text,
        summary,
        lead_image_url,
        extraction_method: method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TRUNCATION_MARKER;

    fn candidate(body: &str) -> Candidate {
        Candidate {
            body_text: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimum_body_boundary() {
        let short = "a".repeat(MIN_BODY_CHARS - 1);
        let exact = "a".repeat(MIN_BODY_CHARS);

        assert_eq!(
            normalize(candidate(&short), ExtractionMethod::Primary),
            Err(ExtractionError::EmptyContent {
                chars: MIN_BODY_CHARS - 1,
                min: MIN_BODY_CHARS
            })
        );
        assert!(normalize(candidate(&exact), ExtractionMethod::Primary).is_ok());
    }

    #[test]
    fn test_whitespace_does_not_count_towards_minimum() {
        let padded = format!("   {}   ", "b".repeat(10));
        assert!(normalize(candidate(&padded), ExtractionMethod::Fallback).is_err());
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let body = "x".repeat(80);
        let record = normalize(
            Candidate {
                title: Some("   ".to_string()),
                ..candidate(&body)
            },
            ExtractionMethod::Fallback,
        )
        .unwrap();
        assert_eq!(record.title, UNKNOWN_TITLE);
        assert_eq!(record.extraction_method, ExtractionMethod::Fallback);
    }

    #[test]
    fn test_summary_falls_back_to_truncated_body() {
        let body = "word ".repeat(300);
        let record = normalize(
            Candidate {
                summary: Some(String::new()),
                ..candidate(&body)
            },
            ExtractionMethod::Primary,
        )
        .unwrap();
        assert!(record.summary.ends_with(TRUNCATION_MARKER));
        assert!(record.body_text.starts_with(record.summary.trim_end_matches(TRUNCATION_MARKER)));
    }

    #[test]
    fn test_fields_are_cleaned() {
        let body = "y".repeat(60);
        let record = normalize(
            Candidate {
                title: Some("  Breaking \n News ".to_string()),
                authors: vec![" Jane  Doe ".to_string(), "  ".to_string()],
                summary: Some(" A summary. ".to_string()),
                lead_image_url: Some(" ".to_string()),
                ..candidate(&body)
            },
            ExtractionMethod::Primary,
        )
        .unwrap();
        assert_eq!(record.title, "Breaking News");
        assert_eq!(record.authors, vec!["Jane Doe"]);
        assert_eq!(record.summary, "A summary.");
        assert_eq!(record.lead_image_url, None);
        assert_eq!(record.publish_date, PublishDate::Unknown);
    }
}
