//! Redis backend for watcher preferences and the island snapshot.

use crate::error::StoreError;
use crate::store::WatchStore;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use tracing::{debug, warn};
use turnip_core::{Island, WatchPrice};

/// Redis key layout.
mod keys {
    /// Hash: chat id -> watched price string.
    pub const USERS: &str = "users";
    /// Hash: island name -> JSON island record, fully replaced each run.
    pub const ISLANDS: &str = "islands";
}

/// Redis-backed [`WatchStore`].
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis at the given URL (`redis://[:pass@]host:port`).
    ///
    /// The connection manager reconnects on its own after transient drops.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl WatchStore for RedisStore {
    async fn watchers(&self) -> Result<HashMap<i64, WatchPrice>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: HashMap<String, String> = conn.hgetall(keys::USERS).await?;

        let mut watchers = HashMap::with_capacity(raw.len());
        for (chat_id, price) in raw {
            // Entries written by older deployments may not validate; skip
            // them rather than poisoning the whole run.
            match (chat_id.parse::<i64>(), price.parse::<WatchPrice>()) {
                (Ok(chat_id), Ok(price)) => {
                    watchers.insert(chat_id, price);
                }
                _ => {
                    warn!(chat_id = %chat_id, price = %price, "Skipping unreadable watcher entry");
                }
            }
        }
        Ok(watchers)
    }

    async fn watch_price(&self, chat_id: i64) -> Result<Option<WatchPrice>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.hget(keys::USERS, chat_id.to_string()).await?;
        Ok(raw.and_then(|p| p.parse().ok()))
    }

    async fn set_watch_price(&self, chat_id: i64, price: WatchPrice) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(keys::USERS, chat_id.to_string(), price.to_string())
            .await?;
        Ok(())
    }

    async fn clear_watch_price(&self, chat_id: i64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.hdel(keys::USERS, chat_id.to_string()).await?;
        Ok(())
    }

    async fn replace_islands(&self, islands: &[Island]) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        // Clear-then-write; see WatchStore::replace_islands for the race.
        let _: () = conn.del(keys::ISLANDS).await?;

        if islands.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        for island in islands {
            pipe.hset(keys::ISLANDS, &island.name, serde_json::to_string(island)?);
        }
        let _: () = pipe.query_async(&mut conn).await?;

        debug!(count = islands.len(), "Snapshot replaced");
        Ok(())
    }

    async fn island(&self, name: &str) -> Result<Option<Island>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.hget(keys::ISLANDS, name).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}
