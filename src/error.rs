//! Error types for every stage of the article pipeline.
//!
//! Each stage owns its own error enum so callers can see exactly where a
//! request stopped:
//!
//! - [`ValidationError`]: the URL safety gate refused the target
//! - [`FetchError`]: the HTTP request failed or returned a non-2xx status
//! - [`ExtractionError`]: neither extractor produced a usable article
//!
//! [`PipelineError`] wraps all three and exposes an [`ErrorCategory`] so the
//! presentation layer can pick a message and exit code without matching on
//! individual variants.

use std::fmt;
use thiserror::Error;

/// Reasons the URL safety gate rejects a target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid URL scheme `{0}`: only http and https are allowed")]
    InvalidScheme(String),

    #[error("invalid URL: no hostname found in `{0}`")]
    MissingHost(String),

    #[error("could not resolve hostname `{host}`: {reason}")]
    ResolutionError { host: String, reason: String },

    #[error("access to local or private network resources is restricted ({host} resolves to {ip})")]
    PrivateNetworkAccess { host: String, ip: std::net::IpAddr },
}

/// Failures while downloading the page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    NetworkError(String),

    #[error("server responded with HTTP status {0}")]
    HttpStatusError(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return FetchError::HttpStatusError(status.as_u16());
        }
        let kind = if e.is_timeout() {
            "request timed out"
        } else if e.is_connect() {
            "connection failed"
        } else {
            "request failed"
        };
        FetchError::NetworkError(format!("{kind}: {e}"))
    }
}

/// Failures of the primary or fallback extractor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("article body is too short ({chars} characters, at least {min} required)")]
    EmptyContent { chars: usize, min: usize },

    #[error("could not parse article: {0}")]
    ParseFailure(String),
}

/// Broad class of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Content,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Validation => "URL validation failed",
            ErrorCategory::Network => "could not download the article",
            ErrorCategory::Content => "could not extract the article",
        };
        f.write_str(s)
    }
}

/// Any failure that stops a request.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Validation(_) => ErrorCategory::Validation,
            PipelineError::Fetch(_) => ErrorCategory::Network,
            PipelineError::Extraction(_) => ErrorCategory::Content,
        }
    }

    /// One-line message for the user: category first, detail second.
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.category(), self)
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Validation => 2,
            ErrorCategory::Network => 3,
            ErrorCategory::Content => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_distinct() {
        let v: PipelineError = ValidationError::MissingHost("x".into()).into();
        let n: PipelineError = FetchError::HttpStatusError(503).into();
        let c: PipelineError = ExtractionError::EmptyContent { chars: 0, min: 50 }.into();

        assert_eq!(v.category(), ErrorCategory::Validation);
        assert_eq!(n.category(), ErrorCategory::Network);
        assert_eq!(c.category(), ErrorCategory::Content);
        assert_ne!(v.exit_code(), n.exit_code());
        assert_ne!(n.exit_code(), c.exit_code());
    }

    #[test]
    fn test_user_message_includes_category_and_detail() {
        let err: PipelineError = FetchError::HttpStatusError(404).into();
        let msg = err.user_message();
        assert!(msg.starts_with("could not download the article"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_private_network_message() {
        let err = ValidationError::PrivateNetworkAccess {
            host: "localhost".into(),
            ip: "127.0.0.1".parse().unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("restricted"));
        assert!(msg.contains("127.0.0.1"));
    }
}
