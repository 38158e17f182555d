//! HTTP fetcher.
//!
//! Downloads one page with a static desktop-browser header set. The
//! [`Fetcher`] owns a single `reqwest::Client`, so connections are pooled
//! for as long as the fetcher lives; each pipeline builds its own.
//!
//! # Limits
//!
//! | Limit | Value |
//! |-------|-------|
//! | Request timeout | [`REQUEST_TIMEOUT`] (15 s) |
//! | Redirect hops | [`MAX_REDIRECTS`] (10), each target validated by the [`SafetyGate`] before it is requested |
//! | Body size | [`MAX_BODY_BYTES`] (5 MiB) |

use crate::error::FetchError;
use crate::models::RawResponse;
use crate::safety::SafetyGate;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, LOCATION, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const MAX_REDIRECTS: usize = 10;
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers
}

/// Reusable HTTP session for downloading article pages.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
    gate: SafetyGate,
}

impl Fetcher {
    /// Build a fetcher with the compiled-in limits.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_limits(REQUEST_TIMEOUT, MAX_BODY_BYTES)
    }

    pub(crate) fn with_limits(timeout: Duration, max_body_bytes: usize) -> Result<Self, FetchError> {
        // Redirects are followed by `fetch` so each hop goes through the async gate.
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_body_bytes,
            gate: SafetyGate::default(),
        })
    }

    /// Use `gate` for redirect targets.
    #[cfg(test)]
    pub(crate) fn with_gate(mut self, gate: SafetyGate) -> Self {
        self.gate = gate;
        self
    }

    /// GET `url` and return its body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::NetworkError`] on timeout, connection failure, refused
    ///   redirect or an oversized body
    /// - [`FetchError::HttpStatusError`] for any non-2xx status
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch(&self, url: &str) -> Result<RawResponse, FetchError> {
        let t0 = Instant::now();
        let mut current =
            Url::parse(url).map_err(|e| FetchError::NetworkError(format!("invalid URL `{url}`: {e}")))?;
        let mut hops = 0;

        let mut response = loop {
            let response = self.client.get(current.clone()).send().await?;
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let location = match location {
                Some(l) if response.status().is_redirection() => l,
                _ => break response,
            };

            if hops >= MAX_REDIRECTS {
                warn!(hops, "Redirect limit reached");
                return Err(FetchError::NetworkError(format!("more than {MAX_REDIRECTS} redirects")));
            }
            let next = current.join(&location).map_err(|e| {
                FetchError::NetworkError(format!("redirect refused: bad location `{location}`: {e}"))
            })?;
            self.gate.validate(next.as_str()).await.map_err(|e| {
                warn!(to = %next, error = %e, "Refused redirect");
                FetchError::NetworkError(format!("redirect refused: {e}"))
            })?;

            debug!(from = %current, to = %next, hop = hops + 1, "Following redirect");
            current = next;
            hops += 1;
        };

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Non-success HTTP status");
            return Err(FetchError::HttpStatusError(status.as_u16()));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes as u64 {
                return Err(self.too_large());
            }
        }

        let final_url = response.url().clone();
        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&bytes).into_owned();

        info!(
            status = status.as_u16(),
            bytes = body.len(),
            redirects = hops,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Ok(RawResponse {
            final_url,
            status: status.as_u16(),
            body,
        })
    }

    fn too_large(&self) -> FetchError {
        warn!(limit = self.max_body_bytes, "Response body too large");
        FetchError::NetworkError(format!(
            "response body exceeds {} bytes",
            self.max_body_bytes
        ))
    }
}
