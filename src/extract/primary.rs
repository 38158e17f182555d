//! Primary extractor adapter.
//!
//! Hands the page to an [`ArticleParser`] and maps its output onto the
//! canonical record. Apart from translation, the adapter owns two
//! resolution chains.
//!
//! # Authors (first non-empty tier wins)
//!
//! 1. The parser's structured author list
//! 2. Parser metadata under `author`, then `dc.creator`, then `byline`
//! 3. A `<meta name="author">` tag read directly from the raw HTML
//!
//! # Publish date
//!
//! The parser's structured date, then metadata under `datePublished` or
//! `article:published_time`. Absent dates are [`PublishDate::Unknown`];
//! unreadable ones are kept as [`PublishDate::Malformed`].

use super::normalize::{normalize, Candidate};
use super::{html, ArticleParser, ParsedArticle};
use crate::error::ExtractionError;
use crate::models::{ArticleRecord, ExtractionMethod, PublishDate};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::Html;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};
use url::Url;

const AUTHOR_META_KEYS: [&str; 3] = ["author", "dc.creator", "byline"];
const DATE_META_KEYS: [&str; 2] = ["datePublished", "article:published_time"];

/// Run the parser and translate its output.
///
/// # Errors
///
/// - [`ExtractionError::ParseFailure`] if the parser fails
/// - [`ExtractionError::EmptyContent`] if its body is below the minimum
#[instrument(level = "info", skip_all, fields(%url))]
pub fn extract_primary(
    raw_html: &str,
    url: &Url,
    parser: &dyn ArticleParser,
) -> Result<ArticleRecord, ExtractionError> {
    let parsed = parser.parse(raw_html, url).map_err(|e| {
        warn!(error = %e, "Article parser failed");
        ExtractionError::ParseFailure(e.to_string())
    })?;

    let authors = resolve_authors(&parsed, raw_html);
    let publish_date = resolve_date(&parsed);

    normalize(
        Candidate {
            title: parsed.title,
            authors,
            publish_date,
            body_text: parsed.text,
            summary: Some(parsed.summary),
            lead_image_url: parsed.top_image,
        },
        ExtractionMethod::Primary,
    )
}

/// Metadata lookup by lowercased key, skipping blank values.
fn meta_value(meta_data: &HashMap<String, String>, key: &str) -> Option<String> {
    meta_data
        .get(&key.to_ascii_lowercase())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn resolve_authors(parsed: &ParsedArticle, raw_html: &str) -> Vec<String> {
    let structured: Vec<String> = parsed
        .authors
        .iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    if !structured.is_empty() {
        debug!(tier = "structured", count = structured.len(), "Resolved authors");
        return structured;
    }

    for key in AUTHOR_META_KEYS {
        if let Some(value) = meta_value(&parsed.meta_data, key) {
            debug!(tier = "metadata", key, "Resolved authors");
            return vec![value];
        }
    }

    let document = Html::parse_document(raw_html);
    if let Some(value) = html::meta_by(&document, "name", "author") {
        debug!(tier = "meta_tag", "Resolved authors");
        return vec![value];
    }

    debug!("No authors found");
    Vec::new()
}

fn resolve_date(parsed: &ParsedArticle) -> PublishDate {
    let raw = parsed
        .publish_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| DATE_META_KEYS.iter().find_map(|k| meta_value(&parsed.meta_data, k)));

    match raw {
        None => PublishDate::Unknown,
        Some(raw) => match parse_date(&raw) {
            Some(date) => PublishDate::Known(date),
            None => {
                warn!(%raw, "Unrecognized publish date");
                PublishDate::Malformed(raw)
            }
        },
    }
}

/// Read the calendar date out of the formats publishers commonly emit.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // "2024-03-05T10:00:00.000+0000" and similar near-ISO stamps.
    s.get(..10)
        .filter(|_| s.as_bytes().get(10).is_some_and(|b| *b == b'T' || *b == b' '))
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}
