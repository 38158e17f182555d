//! Article extraction.
//!
//! Turns a downloaded page into an [`ArticleRecord`]. Two extractors are
//! tried in order:
//!
//! 1. [`primary`]: runs an [`ArticleParser`] and maps its output, resolving
//!    authors and publish date through metadata fallbacks
//! 2. [`fallback`]: reads the title, paragraphs and lead image straight
//!    from the HTML when the primary path fails or comes back too short
//!
//! Both feed [`normalize`], the single place where records are validated.
//!
//! # Submodules
//!
//! - [`parser`]: [`HtmlArticleParser`], the built-in parser
//! - [`html`]: shared DOM helpers (boilerplate stripping, meta lookup)
//! - [`jsonld`]: schema.org JSON-LD metadata

pub mod fallback;
pub mod html;
pub mod jsonld;
pub mod normalize;
pub mod parser;
pub mod primary;

use crate::error::ExtractionError;
use crate::models::ArticleRecord;
use std::collections::HashMap;
use std::error::Error;
use tracing::{error, info, instrument, warn};
use url::Url;

pub use parser::HtmlArticleParser;

/// Output of an [`ArticleParser`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArticle {
    pub title: Option<String>,
    pub authors: Vec<String>,
    /// Publish date as found on the page, unparsed.
    pub publish_date: Option<String>,
    pub text: String,
    pub summary: String,
    pub top_image: Option<String>,
    /// Page metadata keyed by `name`, `property` or `itemprop`, lowercased.
    pub meta_data: HashMap<String, String>,
}

/// Article-parsing engine used by the primary extractor.
pub trait ArticleParser {
    fn parse(&self, html: &str, url: &Url) -> Result<ParsedArticle, Box<dyn Error + Send + Sync>>;
}

/// Extract an article, falling back to raw HTML when the parser fails.
///
/// # Errors
///
/// The fallback extractor's error when both paths fail.
#[instrument(level = "info", skip_all, fields(%url))]
pub fn extract_article(
    raw_html: &str,
    url: &Url,
    parser: &dyn ArticleParser,
) -> Result<ArticleRecord, ExtractionError> {
    match primary::extract_primary(raw_html, url, parser) {
        Ok(record) => {
            info!(method = %record.extraction_method, title = %record.title, "Extracted article");
            Ok(record)
        }
        Err(e) => {
            warn!(error = %e, "Primary extraction failed; trying fallback");
            fallback::extract_fallback(raw_html, url)
                .inspect(|record| {
                    info!(method = %record.extraction_method, title = %record.title, "Extracted article");
                })
                .inspect_err(|e| error!(error = %e, "Fallback extraction failed"))
        }
    }
}
