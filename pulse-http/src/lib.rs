//! Minimal HTTP client for pulling feed documents, with safe logging.
//!
//! - Plain `GET` returning the response body as text
//! - Optional client-wide timeout (transport default otherwise)
//! - No retries: a failed request is reported once and the caller moves on
//! - Optional *raw* request/response logging via `PULSE_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), pulse_http::HttpError> {
//! let client = pulse_http::HttpClient::new("pulse/0.1")?;
//! let body = client.get_text("https://example.com/rss").await?;
//! assert!(!body.is_empty());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`) when `PULSE_HTTP_RAW=1`.

use reqwest::header::{HeaderMap, CONTENT_TYPE, SET_COOKIE};
use reqwest::{Client, StatusCode, Url};
use std::env;
use std::time::Duration;
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "PULSE_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug.
fn make_curl(url: &Url, user_agent: &str) -> String {
    format!(
        "curl -XGET -A '{}' '{}'",
        user_agent.replace('\'', r"'\''"),
        url.as_str()
    )
}

/// Response headers for raw logging, minus any cookies the server sets.
fn loggable_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .filter(|(k, _)| k.as_str() != SET_COOKIE.as_str())
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    user_agent: String,
    /// Applied to every request. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl HttpClient {
    /// Construct a client that identifies itself with `user_agent`.
    ///
    /// ```no_run
    /// use pulse_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("pulse/0.1")?;
    /// assert!(client.timeout.is_none());
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(user_agent: &str) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            user_agent: user_agent.to_string(),
            timeout: None,
        })
    }

    /// Set the per-request timeout. [`HttpClient::new`] starts with none.
    ///
    /// ```no_run
    /// use pulse_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("pulse/0.1")?
    ///     .with_timeout(Some(Duration::from_secs(2)));
    /// assert_eq!(client.timeout, Some(Duration::from_secs(2)));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Option<Duration>) -> Self {
        self.timeout = dur;
        self
    }

    /// GET `url` and return the body decoded as UTF-8 (lossy).
    ///
    /// Any non-2xx status is reported as [`HttpError::Api`].
    pub async fn get_text(&self, url: &str) -> Result<String, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;

        let mut rb = self.inner.get(url.clone());
        let timeout = self.timeout;
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }

        let (host_path, query) = redact_query(&url);
        tracing::debug!(
            host_path=%host_path,
            query=?query,
            timeout_ms=?timeout.map(|t| t.as_millis() as u64),
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&url, &self.user_agent);
            tracing::debug!(target: "http.raw", %curl, "request");
        }

        // ----- Send -----
        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(host_path=%host_path, message=%message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(host_path=%host_path, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::debug!(
            %status,
            duration_ms=dur_ms,
            body_len=content_len(&headers, bytes.len()),
            content_type=%content_type,
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = loggable_headers(&headers);
            let truncated = bytes.len() > RAW_MAX_BODY;
            let end = bytes.len().min(RAW_MAX_BODY);
            let text = String::from_utf8_lossy(&bytes[..end]);
            tracing::info!(
                target: "http.raw",
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(body_snippet=%snippet, "http.response.body_snippet");

        if status.is_success() {
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        tracing::warn!(
            %status,
            host_path=%host_path,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message: snippet,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

fn redact_query(url: &Url) -> (String, Vec<(String, String)>) {
    // Return "host + path" string and redacted query list for logging
    let host_path = format!("{}{}", url.host_str().unwrap_or("-"), url.path());
    let redacted = url
        .query_pairs()
        .map(|(k, v)| {
            let k = k.to_string();
            let v = v.to_string();
            let is_secret = matches!(
                k.to_ascii_lowercase().as_str(),
                "access_token" | "auth" | "key" | "api_key" | "token" | "secret"
            );
            (k, if is_secret { "<redacted>".into() } else { v })
        })
        .collect::<Vec<_>>();
    (host_path, redacted)
}

fn content_len(headers: &HeaderMap, body_len: usize) -> usize {
    headers
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(body_len)
}
