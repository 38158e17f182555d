//! JSON report output.

use crate::models::Report;
use tracing::{debug, instrument};

/// Serialize a [`Report`] as pretty-printed JSON.
#[instrument(level = "info", skip_all, fields(url = %report.source_url))]
pub fn render(report: &Report) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(report)?;
    debug!(bytes = json.len(), "Rendered JSON report");
    Ok(json)
}
