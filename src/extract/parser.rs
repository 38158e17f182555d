//! Built-in article parser.
//!
//! [`HtmlArticleParser`] hands the main-content search to the `readability`
//! crate and uses `scraper` for everything readability does not report:
//! meta tags, JSON-LD, bylines and the lead image. Metadata is read from
//! the untouched document; readability only sees the page after
//! boilerplate has been stripped.

use super::{html, jsonld, ArticleParser, ParsedArticle};
use crate::summarize::{summarize, SUMMARY_SENTENCES};
use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::error::Error;
use std::io::Cursor;
use tracing::{debug, instrument};
use url::Url;

/// Paragraphs shorter than this are dropped from the body.
pub const MIN_PARAGRAPH_CHARS: usize = 25;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("h1 selector"));
static BYLINE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[rel="author"], [itemprop="author"]"#).expect("byline selector"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("p selector"));
static TIME_PUBLISHED: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"time[itemprop="datePublished"][datetime]"#).expect("time selector"));

/// Default article parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlArticleParser;

impl ArticleParser for HtmlArticleParser {
    #[instrument(level = "info", skip_all, fields(%url))]
    fn parse(&self, raw_html: &str, url: &Url) -> Result<ParsedArticle, Box<dyn Error + Send + Sync>> {
        let mut document = Html::parse_document(raw_html);

        let mut meta_data = html::meta_map(&document);
        if let Some(time) = document.select(&TIME_PUBLISHED).next() {
            if let Some(datetime) = time.value().attr("datetime") {
                meta_data
                    .entry("datepublished".to_string())
                    .or_insert_with(|| datetime.trim().to_string());
            }
        }
        let linked = jsonld::extract(&document);

        let mut authors = linked.authors;
        if authors.is_empty() {
            authors = bylines(&document);
        }

        let publish_date = linked
            .date_published
            .or_else(|| html::meta_property(&document, "article:published_time"));

        let top_image = html::meta_property(&document, "og:image")
            .or_else(|| html::meta_property(&document, "twitter:image"))
            .or(linked.image)
            .and_then(|src| url.join(&src).ok())
            .map(|u| u.to_string());

        let og_title = html::meta_property(&document, "og:title");
        let h1 = html::first_text(&document, &H1);

        html::strip_boilerplate(&mut document);
        let mut cursor = Cursor::new(document.html().into_bytes());
        let product = readability::extractor::extract(&mut cursor, url)
            .map_err(|e| format!("readability could not read the page: {e}"))?;

        let text = body_text(&product.content, &product.text).ok_or("no article body found")?;

        let readable_title = collapse_whitespace(&product.title);
        let title = og_title
            .or(linked.headline)
            .or_else(|| Some(readable_title).filter(|t| !t.is_empty()))
            .or(h1);
        let summary = summarize(title.as_deref().unwrap_or_default(), &text, SUMMARY_SENTENCES);

        debug!(
            title = title.as_deref().unwrap_or_default(),
            authors = authors.len(),
            chars = text.chars().count(),
            "Parsed article"
        );

        Ok(ParsedArticle {
            title,
            authors,
            publish_date,
            text,
            summary,
            top_image,
            meta_data,
        })
    }
}

/// Author names from `rel="author"` links and `itemprop="author"` elements.
fn bylines(document: &Html) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for el in document.select(&BYLINE) {
        let name = html::element_text(el);
        let name = name.strip_prefix("By ").unwrap_or(&name).trim().to_string();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Paragraphs of readability's cleaned content, blank-line separated.
///
/// Falls back to readability's plain text when the content carries no
/// paragraph long enough to keep.
fn body_text(content: &str, plain: &str) -> Option<String> {
    let fragment = Html::parse_fragment(content);
    let paragraphs: Vec<String> = fragment
        .select(&PARAGRAPH)
        .map(html::element_text)
        .filter(|t| t.chars().count() >= MIN_PARAGRAPH_CHARS)
        .collect();
    if !paragraphs.is_empty() {
        return Some(paragraphs.join("\n\n"));
    }

    let plain = collapse_whitespace(plain);
    (plain.chars().count() >= MIN_PARAGRAPH_CHARS).then_some(plain)
}
