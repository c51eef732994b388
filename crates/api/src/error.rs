//! Error types for marketplace API calls.

use thiserror::Error;

/// Errors that can occur while fetching islands.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("marketplace unreachable: {0}")]
    Network(String),

    #[error("unexpected marketplace payload: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::MalformedResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl ApiError {
    /// Returns true if the next scheduled fetch is likely to succeed.
    ///
    /// The notify task never retries within a run either way; this only
    /// informs log severity.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
