//! Enrichment fetch errors and their serialisable classification.
//!
//! `FetchError` is the working error inside the enrichment subsystem.
//! Gatherers never let it escape: at their boundary it is folded into a
//! [`FetchFailure`], a schema-complete value that rides inside the
//! enrichment reports.

use serde::{Deserialize, Serialize};

/// Errors from external enrichment calls.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Could not connect to the endpoint
    #[error("connection failed: {0}")]
    Connect(String),

    /// Endpoint returned a non-success HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Response body was not the expected shape
    #[error("unexpected response shape: {0}")]
    Malformed(String),

    /// Any other transport-level failure
    #[error("request failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Whether the retry policy should attempt this call again.
    ///
    /// Retryable: rate limiting (429), server errors (500/502/503/504),
    /// timeouts and connection failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Status(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            FetchError::Timeout | FetchError::Connect(_) => true,
            FetchError::Malformed(_) | FetchError::Other(_) => false,
        }
    }

    /// Whether this is an HTTP 429; logged distinctly by the retry policy.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::Status(429))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

/// Broad failure classes surfaced to report consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    RateLimited,
    ServerError,
    Network,
    Malformed,
    Other,
}

/// A fetch failure as recorded on an enrichment report.
///
/// Always fully formed: a report with `api_success == false` carries one
/// of these, so consumers never branch on missing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&FetchError> for FetchFailure {
    fn from(err: &FetchError) -> Self {
        let kind = match err {
            FetchError::Timeout => FailureKind::Timeout,
            FetchError::Status(429) => FailureKind::RateLimited,
            FetchError::Status(s) if *s >= 500 => FailureKind::ServerError,
            FetchError::Status(_) => FailureKind::Other,
            FetchError::Connect(_) => FailureKind::Network,
            FetchError::Malformed(_) => FailureKind::Malformed,
            FetchError::Other(_) => FailureKind::Other,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}
