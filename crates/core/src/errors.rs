use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

/// A non-2xx response from the REST API, kept in structured form so callers
/// can branch on the status code (validation vs. auth vs. everything else).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpFailure {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    /// Parsed JSON error body, raw text, or `{}` when the body was empty.
    pub data: Value,
}

impl HttpFailure {
    pub fn new(status: u16, data: Value) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: HashMap::new(),
            data,
        }
    }

    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }
}

impl std::fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.status_text.is_empty() {
            write!(f, "{}", self.status)
        } else {
            write!(f, "{} {}", self.status, self.status_text)
        }
    }
}

/// Unified error type for the entire wallet-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Persisted session storage ───────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── API / Network ───────────────────────────────────────────────
    /// The request never produced a response (DNS, connect, timeout...).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(HttpFailure),

    /// The server answered 2xx but the body did not have the expected shape.
    #[error("Unexpected response payload: {0}")]
    Payload(String),

    // ── Session / Addressing ────────────────────────────────────────
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    #[error("Resource {0} requires a parent id")]
    MissingParent(String),

    #[error("Resource {0} has no id")]
    MissingId(String),
}

impl CoreError {
    /// Status code of a structured HTTP failure, `None` for everything else.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            CoreError::Http(failure) => Some(failure.status),
            _ => None,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<HttpFailure> for CoreError {
    fn from(failure: HttpFailure) -> Self {
        CoreError::Http(failure)
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query strings from URLs embedded in the message.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
