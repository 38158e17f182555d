//! Data models for fetched pages, extracted articles and their analytics.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawResponse`]: The downloaded page as returned by the fetcher
//! - [`ArticleRecord`]: The canonical article produced by either extractor
//! - [`PublishDate`]: Publication date with "missing" and "malformed" kept apart
//! - [`SentimentResult`]: Polarity, subjectivity and the derived label
//! - [`Report`]: Everything handed to the presentation layer for one request

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

/// A downloaded page.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// URL after redirects.
    pub final_url: Url,
    /// HTTP status code (always 2xx).
    pub status: u16,
    /// Decoded response body.
    pub body: String,
}

/// Which extractor produced an [`ArticleRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Primary,
    Fallback,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::Primary => f.write_str("primary"),
            ExtractionMethod::Fallback => f.write_str("fallback"),
        }
    }
}

/// Publication date of an article.
///
/// `Unknown` means no source carried a date; `Malformed` keeps the raw value
/// when a date was present but could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PublishDate {
    Known(NaiveDate),
    #[default]
    Unknown,
    Malformed(String),
}

impl PublishDate {
    /// `YYYY-MM-DD` when the date is known.
    pub fn iso(&self) -> Option<String> {
        match self {
            PublishDate::Known(d) => Some(d.format("%Y-%m-%d").to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for PublishDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishDate::Known(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PublishDate::Unknown => f.write_str("Not Available"),
            PublishDate::Malformed(raw) => write!(f, "Unrecognized date ({raw})"),
        }
    }
}

impl Serialize for PublishDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("PublishDate", 2)?;
        match self {
            PublishDate::Known(_) => {
                s.serialize_field("status", "known")?;
                s.serialize_field("value", &self.iso())?;
            }
            PublishDate::Unknown => {
                s.serialize_field("status", "unknown")?;
                s.serialize_field("value", &Option::<String>::None)?;
            }
            PublishDate::Malformed(raw) => {
                s.serialize_field("status", "malformed")?;
                s.serialize_field("value", raw)?;
            }
        }
        s.end()
    }
}

/// The canonical article for one request.
///
/// Only the normalizer builds these, so every record satisfies the
/// non-empty title and minimum body length invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub publish_date: PublishDate,
    pub body_text: String,
    pub summary: String,
    pub lead_image_url: Option<String>,
    pub extraction_method: ExtractionMethod,
}

/// Sentiment label derived from polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// Sentiment scores for an article body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    /// -1.0 (unfavorable) to 1.0 (favorable).
    pub polarity: f64,
    /// 0.0 (factual) to 1.0 (opinion).
    pub subjectivity: f64,
    pub label: SentimentLabel,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source_url: String,
    pub article: ArticleRecord,
    pub sentiment: Option<SentimentResult>,
}
