//! HTML helpers shared by both extractors.

use crate::utils::collapse_whitespace;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Elements that never carry article text.
pub const BOILERPLATE: &str = "script, style, nav, header, footer, aside, noscript, iframe";

static BOILERPLATE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(BOILERPLATE).expect("boilerplate selector"));
static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").expect("meta selector"));

/// Detach every boilerplate element from the tree.
///
/// Must run before any body text is collected.
pub fn strip_boilerplate(document: &mut Html) {
    let ids: Vec<_> = document
        .select(&BOILERPLATE_SELECTOR)
        .map(|el| el.id())
        .collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Visible text of an element with whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Text of the first element matching `selector` that has any text.
pub fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

/// `content` of the first `<meta>` whose `attr` equals `key`, ignoring ASCII case.
pub fn meta_by(document: &Html, attr: &str, key: &str) -> Option<String> {
    document
        .select(&META_SELECTOR)
        .filter(|m| {
            m.value()
                .attr(attr)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(key))
        })
        .filter_map(|m| m.value().attr("content"))
        .map(collapse_whitespace)
        .find(|c| !c.is_empty())
}

/// `og:*` style tags appear under both `property` and `name` in the wild.
pub fn meta_property(document: &Html, key: &str) -> Option<String> {
    meta_by(document, "property", key).or_else(|| meta_by(document, "name", key))
}

/// All `<meta>` tags keyed by lowercased `name`, `property` or `itemprop`.
///
/// The first occurrence of a key wins.
pub fn meta_map(document: &Html) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for meta in document.select(&META_SELECTOR) {
        let el = meta.value();
        let Some(content) = el.attr("content").map(collapse_whitespace) else {
            continue;
        };
        if content.is_empty() {
            continue;
        }
        for attr in ["name", "property", "itemprop"] {
            if let Some(key) = el.attr(attr) {
                map.entry(key.trim().to_ascii_lowercase())
                    .or_insert_with(|| content.clone());
            }
        }
    }
    map
}
