//! Request orchestration.
//!
//! One [`Pipeline::run`] takes a URL through the stages in strict order:
//!
//! 1. Safety gate ([`SafetyGate::validate`]); nothing is sent if it refuses
//! 2. Fetch ([`Fetcher::fetch`])
//! 3. Extraction ([`extract_article`]), primary then fallback
//! 4. Sentiment ([`sentiment::score`]), when enabled
//!
//! The first failing stage ends the run and its error is returned wrapped
//! in [`PipelineError`](crate::error::PipelineError).

use crate::error::{FetchError, Result};
use crate::extract::{extract_article, ArticleParser, HtmlArticleParser};
use crate::fetcher::Fetcher;
use crate::models::Report;
use crate::safety::SafetyGate;
use crate::sentiment::{self, LexiconAnalyzer, TextAnalyzer};
use tracing::{debug, instrument};

/// A configured pipeline: fetcher, article parser and sentiment analyzer.
pub struct Pipeline<P = HtmlArticleParser, A = LexiconAnalyzer> {
    gate: SafetyGate,
    fetcher: Fetcher,
    parser: P,
    analyzer: A,
}

impl Pipeline {
    /// Pipeline with the built-in parser and analyzer.
    pub fn new() -> std::result::Result<Self, FetchError> {
        Ok(Self::with_parts(Fetcher::new()?, HtmlArticleParser, LexiconAnalyzer))
    }
}

impl<P: ArticleParser, A: TextAnalyzer> Pipeline<P, A> {
    pub fn with_parts(fetcher: Fetcher, parser: P, analyzer: A) -> Self {
        Self {
            gate: SafetyGate::default(),
            fetcher,
            parser,
            analyzer,
        }
    }

    /// Use `gate` for the request URL and every redirect hop.
    #[cfg(test)]
    pub(crate) fn with_gate(mut self, gate: SafetyGate) -> Self {
        self.fetcher = self.fetcher.with_gate(gate);
        self.gate = gate;
        self
    }

    /// Validate, fetch, extract and optionally score one article.
    #[instrument(level = "info", skip_all, fields(%url, with_sentiment))]
    pub async fn run(&self, url: &str, with_sentiment: bool) -> Result<Report> {
        self.gate.validate(url).await?;

        let raw = self.fetcher.fetch(url).await?;
        debug!(status = raw.status, final_url = %raw.final_url, "Handing page to extraction");

        let article = extract_article(&raw.body, &raw.final_url, &self.parser)?;

        let sentiment = with_sentiment.then(|| sentiment::score(&self.analyzer, &article.body_text));

        Ok(Report {
            source_url: url.to_string(),
            article,
            sentiment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, PipelineError, ValidationError};
    use crate::extract::ParsedArticle;
    use crate::models::ExtractionMethod;
    use httpmock::prelude::*;
    use std::error::Error;
    use url::Url;

    const PAGE: &str = r#"<html><head><title>Bridge Reopens | City Paper</title>
        <meta name="author" content="Mara Quinn">
        <meta property="og:image" content="/img/bridge.jpg"></head>
        <body><nav><a href="/">Home</a></nav>
        <article>
          <h1>Bridge Reopens</h1>
          <p>The old river bridge reopened on Monday after a wonderful restoration that took two years.</p>
          <p>Commuters said the new lanes were a great improvement and traffic moved smoothly all day.</p>
          <p>City engineers praised the crews and said the structure should last another century.</p>
        </article></body></html>"#;

    struct FailingParser;

    impl ArticleParser for FailingParser {
        fn parse(&self, _html: &str, _url: &Url) -> std::result::Result<ParsedArticle, Box<dyn Error + Send + Sync>> {
            Err("parser unavailable".into())
        }
    }

    async fn serve_page(server: &MockServer) -> httpmock::Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/article");
                then.status(200)
                    .header("content-type", "text/html; charset=utf-8")
                    .body(PAGE);
            })
            .await
    }

    fn local_pipeline() -> Pipeline {
        Pipeline::new().unwrap().with_gate(SafetyGate::allowing_loopback())
    }

    #[tokio::test]
    async fn test_run_extracts_article_with_sentiment() {
        let server = MockServer::start_async().await;
        let page = serve_page(&server).await;
        let url = server.url("/article");

        let report = local_pipeline().run(&url, true).await.unwrap();

        page.assert_async().await;
        assert_eq!(report.source_url, url);
        assert_eq!(report.article.extraction_method, ExtractionMethod::Primary);
        assert_eq!(report.article.authors, vec!["Mara Quinn"]);
        assert!(report.article.body_text.contains("reopened on Monday"));
        assert_eq!(
            report.article.lead_image_url,
            Some(format!("http://127.0.0.1:{}/img/bridge.jpg", server.port()))
        );
        let sentiment = report.sentiment.expect("sentiment requested");
        assert!(sentiment.polarity > 0.0);
    }

    #[tokio::test]
    async fn test_run_without_sentiment() {
        let server = MockServer::start_async().await;
        serve_page(&server).await;

        let report = local_pipeline().run(&server.url("/article"), false).await.unwrap();
        assert!(report.sentiment.is_none());
    }

    #[tokio::test]
    async fn test_run_falls_back_when_parser_fails() {
        let server = MockServer::start_async().await;
        serve_page(&server).await;

        let pipeline = Pipeline::with_parts(Fetcher::new().unwrap(), FailingParser, LexiconAnalyzer)
            .with_gate(SafetyGate::allowing_loopback());
        let report = pipeline.run(&server.url("/article"), true).await.unwrap();

        assert_eq!(report.article.extraction_method, ExtractionMethod::Fallback);
        assert_eq!(report.article.title, "Bridge Reopens");
        assert!(report.article.authors.is_empty());
        assert!(report.article.body_text.starts_with("The old river bridge reopened"));
        assert!(report.sentiment.is_some());
    }

    #[tokio::test]
    async fn test_run_twice_gives_equal_records() {
        let server = MockServer::start_async().await;
        let page = serve_page(&server).await;
        let url = server.url("/article");
        let pipeline = local_pipeline();

        let first = pipeline.run(&url, true).await.unwrap();
        let second = pipeline.run(&url, true).await.unwrap();

        page.assert_hits_async(2).await;
        assert_eq!(first.article, second.article);
        assert_eq!(first.sentiment, second.sentiment);
    }

    #[tokio::test]
    async fn test_loopback_target_is_refused_before_fetching() {
        let server = MockServer::start_async().await;
        let page = serve_page(&server).await;

        let pipeline = Pipeline::new().unwrap();
        let err = pipeline.run(&server.url("/article"), true).await.unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::PrivateNetworkAccess { .. })
        ));
        page.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_invalid_scheme_is_validation_error() {
        let pipeline = Pipeline::new().unwrap();
        let err = pipeline.run("ftp://example.com/file", false).await.unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::InvalidScheme(ref s)) if s == "ftp"
        ));
    }
}
