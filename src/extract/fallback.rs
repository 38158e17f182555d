//! Fallback extractor.
//!
//! Rebuilds a minimal article straight from the HTML when the primary path
//! fails: boilerplate is stripped first, then the title, the meaningful
//! paragraphs and the OpenGraph image are collected. Authors and date are
//! left empty. A relative image path is resolved against the page URL.

use super::html;
use super::normalize::{normalize, Candidate};
use crate::error::ExtractionError;
use crate::models::{ArticleRecord, ExtractionMethod, PublishDate};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

/// Paragraphs at or below this many characters are treated as noise.
pub const PARAGRAPH_NOISE_CHARS: usize = 40;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("h1 selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("title selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("p selector"));

/// Derive an article directly from raw HTML.
///
/// # Errors
///
/// [`ExtractionError::EmptyContent`] when the kept paragraphs add up to
/// less than the minimum body length.
#[instrument(level = "info", skip_all, fields(%url, bytes = raw_html.len()))]
pub fn extract_fallback(raw_html: &str, url: &Url) -> Result<ArticleRecord, ExtractionError> {
    let mut document = Html::parse_document(raw_html);
    html::strip_boilerplate(&mut document);

    let title = html::first_text(&document, &H1).or_else(|| html::first_text(&document, &TITLE));

    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH)
        .map(html::element_text)
        .filter(|text| text.chars().count() > PARAGRAPH_NOISE_CHARS)
        .collect();
    debug!(kept = paragraphs.len(), "Collected paragraphs");

    let lead_image_url = html::meta_property(&document, "og:image")
        .and_then(|src| url.join(&src).ok())
        .map(|u| u.to_string());

    normalize(
        Candidate {
            title,
            authors: Vec::new(),
            publish_date: PublishDate::Unknown,
            body_text: paragraphs.join(" "),
            summary: None,
            lead_image_url,
        },
        ExtractionMethod::Fallback,
    )
}
