//! Schema.org JSON-LD metadata embedded in `<script type="application/ld+json">`.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

static LD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script[type='application/ld+json']").expect("ld+json selector"));

/// Article fields found in JSON-LD blocks.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LinkedData {
    pub headline: Option<String>,
    pub authors: Vec<String>,
    pub date_published: Option<String>,
    pub image: Option<String>,
}

/// Collect article metadata from every JSON-LD block in the document.
///
/// Blocks may hold a single object, an array, or a `@graph`; the first
/// value seen for each field wins and authors are gathered from the first
/// object that lists any.
pub fn extract(document: &Html) -> LinkedData {
    let mut data = LinkedData::default();

    for script in document.select(&LD_SELECTOR) {
        let raw = script.text().collect::<String>();
        let raw = raw
            .trim()
            .trim_start_matches("<![CDATA[")
            .trim_end_matches("]]>")
            .trim();
        let Ok(json) = serde_json::from_str::<Value>(raw) else {
            continue;
        };
        for object in objects(&json) {
            merge(&mut data, object);
        }
    }

    data
}

fn objects(json: &Value) -> Vec<&Value> {
    match json {
        Value::Array(items) => items.iter().flat_map(objects).collect(),
        Value::Object(map) => {
            let mut out = vec![json];
            if let Some(graph) = map.get("@graph") {
                out.extend(objects(graph));
            }
            out
        }
        _ => Vec::new(),
    }
}

fn merge(data: &mut LinkedData, object: &Value) {
    if data.headline.is_none() {
        data.headline = string_field(object, "headline");
    }
    if data.date_published.is_none() {
        data.date_published = string_field(object, "datePublished");
    }
    if data.image.is_none() {
        data.image = object.get("image").and_then(image_url);
    }
    if data.authors.is_empty() {
        if let Some(author) = object.get("author") {
            data.authors = author_names(author);
        }
    }
}

fn string_field(object: &Value, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn author_names(author: &Value) -> Vec<String> {
    match author {
        Value::Array(arr) => arr.iter().flat_map(author_names).collect(),
        Value::Object(_) => string_field(author, "name").into_iter().collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn image_url(image: &Value) -> Option<String> {
    match image {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(_) => string_field(image, "url"),
        Value::Array(arr) => arr.iter().find_map(image_url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_news_article() {
        let doc = Html::parse_document(
            r#"<html><head><script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "NewsArticle",
                "headline": "Rivers Rise",
                "datePublished": "2024-03-05T10:00:00Z",
                "image": {"@type": "ImageObject", "url": "https://example.com/river.jpg"},
                "author": [{"@type": "Person", "name": "Ana Ruiz"}, {"@type": "Person", "name": "Tom Lee"}]
            }
            </script></head><body></body></html>"#,
        );
        let data = extract(&doc);
        assert_eq!(data.headline.as_deref(), Some("Rivers Rise"));
        assert_eq!(data.date_published.as_deref(), Some("2024-03-05T10:00:00Z"));
        assert_eq!(data.image.as_deref(), Some("https://example.com/river.jpg"));
        assert_eq!(data.authors, vec!["Ana Ruiz", "Tom Lee"]);
    }

    #[test]
    fn test_extract_graph_and_string_author() {
        let doc = Html::parse_document(
            r#"<html><head><script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [
                {"@type": "WebSite", "name": "Example"},
                {"@type": "Article", "author": "Staff Writer", "datePublished": "2023-11-30"}
            ]}
            </script></head></html>"#,
        );
        let data = extract(&doc);
        assert_eq!(data.authors, vec!["Staff Writer"]);
        assert_eq!(data.date_published.as_deref(), Some("2023-11-30"));
    }

    #[test]
    fn test_invalid_json_is_ignored() {
        let doc = Html::parse_document(
            r#"<html><head><script type="application/ld+json">{ not json</script></head></html>"#,
        );
        assert_eq!(extract(&doc), LinkedData::default());
    }
}
