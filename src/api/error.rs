//! Error taxonomy shared by the translation and speech clients.
//!
//! Every variant is terminal for the current run: the clients never retry,
//! and the pipeline surfaces the error verbatim to the caller.

use thiserror::Error;

// ---------------------------------------------------------------------------
// ApiClientError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the remote provider.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// Transport-level failure (DNS, connection refused, TLS, …).
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Non-2xx HTTP response.  `body` is the response text, pretty-printed
    /// when it parses as JSON.
    #[error("API returned HTTP {status}:\n{body}")]
    Api { status: u16, body: String },

    /// A 2xx response that lacks the expected content, or whose content is
    /// empty after trimming.
    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    /// A 2xx response whose `Content-Type` is not audio.  `detail` carries
    /// the request parameters to aid debugging against provider API drift.
    #[error("expected audio but got content-type {content_type:?} ({detail})")]
    UnexpectedContentType { content_type: String, detail: String },
}

impl From<reqwest::Error> for ApiClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiClientError::Timeout
        } else {
            ApiClientError::Network(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Best-effort pretty-printing of an error body: re-indent when the text is
/// valid JSON, pass it through unchanged otherwise.
pub(crate) fn pretty_body(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
