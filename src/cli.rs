//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::{Parser, ValueEnum};

/// Page summarized when no URL is given.
pub const DEFAULT_URL: &str = "https://en.wikipedia.org/wiki/Rust_(programming_language)";

/// Report layout written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Sectioned plain text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Command-line arguments for the news summarizer.
///
/// # Examples
///
/// ```sh
/// # Summarize the built-in example page
/// news_summarizer
///
/// # Summarize an article as JSON, without sentiment
/// news_summarizer https://example.com/story --format json --no-sentiment
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Article URL (http or https)
    #[arg(default_value = DEFAULT_URL)]
    pub url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Skip sentiment analysis
    #[arg(long)]
    pub no_sentiment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news_summarizer"]);

        assert_eq!(cli.url, DEFAULT_URL);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.no_sentiment);
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "news_summarizer",
            "https://example.com/story",
            "--format",
            "json",
            "--no-sentiment",
        ]);

        assert_eq!(cli.url, "https://example.com/story");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.no_sentiment);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["news_summarizer", "-f", "json", "http://example.org/"]);

        assert_eq!(cli.url, "http://example.org/");
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["news_summarizer", "--format", "xml"]).is_err());
    }
}
