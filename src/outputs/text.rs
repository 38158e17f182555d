//! Plain-text report for the terminal.
//!
//! ```text
//! == Title ==
//! Harbor Reopens
//!
//! == Author(s) ==
//! Ana Ruiz, Tom Lee
//! ...
//! ```

use crate::models::Report;
use itertools::Itertools;
use std::fmt;

const NOT_AVAILABLE: &str = "Not Available";

/// Display adapter that lays a [`Report`] out as titled sections.
pub struct TextReport<'a>(pub &'a Report);

fn section(f: &mut fmt::Formatter<'_>, heading: &str, body: impl fmt::Display) -> fmt::Result {
    writeln!(f, "== {heading} ==")?;
    writeln!(f, "{body}")?;
    writeln!(f)
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let article = &self.0.article;

        section(f, "Title", &article.title)?;

        let authors = if article.authors.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            article.authors.iter().join(", ")
        };
        section(f, "Author(s)", authors)?;
        section(f, "Publication Date", &article.publish_date)?;
        section(f, "Summary", &article.summary)?;

        if let Some(s) = &self.0.sentiment {
            section(
                f,
                "Sentiment Analysis",
                format_args!(
                    "Polarity: {:.2}, Subjectivity: {:.2}, Sentiment: {}",
                    s.polarity, s.subjectivity, s.label
                ),
            )?;
        }

        section(f, "Lead Image", article.lead_image_url.as_deref().unwrap_or(NOT_AVAILABLE))?;
        write!(
            f,
            "Source: {} (extracted by {} parser)",
            self.0.source_url, article.extraction_method
        )
    }
}

/// Render a [`Report`] as the sectioned text layout.
pub fn render(report: &Report) -> String {
    TextReport(report).to_string()
}
