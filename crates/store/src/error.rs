//! Error types for store operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[from] redis::RedisError),

    #[error("stored record corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}
