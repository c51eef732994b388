//! The store contract the bot and notify task depend on.

use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use turnip_core::{Island, WatchPrice};

/// Watcher preferences plus the latest island snapshot.
///
/// Implementations are injected into handlers and the notify task, so both
/// run unchanged against Redis or the in-memory backend.
#[async_trait]
pub trait WatchStore: Send + Sync {
    /// Every subscribed user and their threshold.
    ///
    /// An empty map short-circuits the notify task before any API call.
    async fn watchers(&self) -> Result<HashMap<i64, WatchPrice>, StoreError>;

    /// One user's threshold, if they are subscribed.
    async fn watch_price(&self, chat_id: i64) -> Result<Option<WatchPrice>, StoreError>;

    /// Upsert a user's threshold.
    async fn set_watch_price(&self, chat_id: i64, price: WatchPrice) -> Result<(), StoreError>;

    /// Remove a user's threshold. Removing an absent user is not an error.
    async fn clear_watch_price(&self, chat_id: i64) -> Result<(), StoreError>;

    /// Replace the snapshot with this batch, keyed by island name.
    ///
    /// Clear-then-write, not atomic: a concurrent detail lookup during the
    /// window may miss an island. Detail lookups are best-effort, so this
    /// race is accepted.
    async fn replace_islands(&self, islands: &[Island]) -> Result<(), StoreError>;

    /// Look up one island from the latest snapshot.
    async fn island(&self, name: &str) -> Result<Option<Island>, StoreError>;
}
