//! # News Summarizer
//!
//! Fetches a single news article by URL, extracts its title, authors,
//! publication date, body and lead image, summarizes it and scores its
//! sentiment.
//!
//! ## Usage
//!
//! ```sh
//! news_summarizer https://example.com/story
//! news_summarizer https://example.com/story --format json --no-sentiment
//! ```
//!
//! ## Architecture
//!
//! Each request runs through a strictly sequential pipeline:
//! 1. **Safety gate**: refuse non-http(s) URLs and anything that resolves to
//!    a loopback, private or reserved address
//! 2. **Fetching**: download the page with browser-like headers
//! 3. **Extraction**: readability-based parser first, raw-HTML fallback second
//! 4. **Analytics**: lexicon-based polarity and subjectivity
//! 5. **Output**: sectioned text or JSON on stdout; logs go to stderr

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod error;
mod extract;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod safety;
mod sentiment;
mod summarize;
mod utils;

use cli::{Cli, OutputFormat};
use outputs::{json, text};
use pipeline::Pipeline;

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("news_summarizer starting up");

    let args = Cli::parse();
    debug!(url = %args.url, format = ?args.format, no_sentiment = args.no_sentiment, "Parsed CLI arguments");

    let pipeline = Pipeline::new()?;
    let report = match pipeline.run(&args.url, !args.no_sentiment).await {
        Ok(report) => report,
        Err(e) => {
            error!(url = %args.url, category = ?e.category(), error = %e, "Request failed");
            eprintln!("Error: {}", e.user_message());
            std::process::exit(e.exit_code());
        }
    };

    let rendered = match args.format {
        OutputFormat::Text => text::render(&report),
        OutputFormat::Json => json::render(&report)?,
    };
    println!("{rendered}");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        method = %report.article.extraction_method,
        "Execution complete"
    );

    Ok(())
}
