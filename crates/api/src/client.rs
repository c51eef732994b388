//! REST client for the Turnip.Exchange islands endpoint.
//!
//! One POST per fetch with a fixed body; no server-side filtering beyond
//! the endpoint defaults. Retry and timeout policy belong to the caller.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use turnip_core::Island;

const BASE_URL: &str = "https://api.turnip.exchange/islands";

/// Fixed request body sent on every fetch.
#[derive(Debug, Serialize)]
struct IslandsRequest {
    islander: &'static str,
    category: &'static str,
}

impl Default for IslandsRequest {
    fn default() -> Self {
        Self {
            islander: "neither",
            category: "turnips",
        }
    }
}

/// Source of island batches, injectable for tests.
#[async_trait]
pub trait IslandSource: Send + Sync {
    /// Fetch the current island batch.
    ///
    /// May return the "No Islands" placeholder as its only element; callers
    /// detect that with [`turnip_core::no_islands`].
    async fn fetch_islands(&self) -> Result<Vec<Island>, ApiError>;
}

/// HTTP client for the Turnip.Exchange API.
#[derive(Debug, Clone, Default)]
pub struct TurnipExchangeClient {
    http: reqwest::Client,
}

impl TurnipExchangeClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IslandSource for TurnipExchangeClient {
    async fn fetch_islands(&self) -> Result<Vec<Island>, ApiError> {
        let response = self
            .http
            .post(BASE_URL)
            .json(&IslandsRequest::default())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Network(format!("HTTP {}", response.status())));
        }

        let body: serde_json::Value = response.json().await?;
        parse_islands(&body)
    }
}

/// Extract and validate island records from the response envelope.
///
/// Records that fail to decode are logged and skipped instead of failing
/// the batch; the API's dynamic JSON sprouts fields and the bot only needs
/// the ones it renders.
pub fn parse_islands(body: &serde_json::Value) -> Result<Vec<Island>, ApiError> {
    if let Some(false) = body.get("success").and_then(|v| v.as_bool()) {
        let message = body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("no message");
        return Err(ApiError::MalformedResponse(format!(
            "API reported failure: {message}"
        )));
    }

    let records = body
        .get("islands")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ApiError::MalformedResponse("missing islands array".to_string()))?;

    let mut islands = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<Island>(record.clone()) {
            Ok(island) => islands.push(island),
            Err(e) => {
                warn!(error = %e, "Skipping malformed island record");
            }
        }
    }

    debug!(count = islands.len(), "Fetched islands");
    Ok(islands)
}
