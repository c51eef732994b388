//! In-memory backend for tests and Redis-less local runs.

use crate::error::StoreError;
use crate::store::WatchStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use turnip_core::{Island, WatchPrice};

/// [`WatchStore`] over tokio-locked maps. Never fails.
#[derive(Default)]
pub struct MemoryStore {
    watchers: RwLock<HashMap<i64, WatchPrice>>,
    islands: RwLock<HashMap<String, Island>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WatchStore for MemoryStore {
    async fn watchers(&self) -> Result<HashMap<i64, WatchPrice>, StoreError> {
        Ok(self.watchers.read().await.clone())
    }

    async fn watch_price(&self, chat_id: i64) -> Result<Option<WatchPrice>, StoreError> {
        Ok(self.watchers.read().await.get(&chat_id).copied())
    }

    async fn set_watch_price(&self, chat_id: i64, price: WatchPrice) -> Result<(), StoreError> {
        self.watchers.write().await.insert(chat_id, price);
        Ok(())
    }

    async fn clear_watch_price(&self, chat_id: i64) -> Result<(), StoreError> {
        self.watchers.write().await.remove(&chat_id);
        Ok(())
    }

    async fn replace_islands(&self, islands: &[Island]) -> Result<(), StoreError> {
        let mut map = self.islands.write().await;
        map.clear();
        for island in islands {
            map.insert(island.name.clone(), island.clone());
        }
        Ok(())
    }

    async fn island(&self, name: &str) -> Result<Option<Island>, StoreError> {
        Ok(self.islands.read().await.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use turnip_core::Hemisphere;

    fn island(name: &str, price: u32) -> Island {
        Island {
            name: name.to_string(),
            turnip_price: price,
            turnip_code: "code".to_string(),
            hemisphere: Hemisphere::North,
            fee: 0,
            queued: "1/8".to_string(),
            max_queue: 8,
            rating: 0.0,
            rating_count: 0,
            description: String::new(),
            creation_time: String::new(),
            islander: String::new(),
            category: String::new(),
        }
    }

    #[tokio::test]
    async fn test_watcher_upsert_and_clear() {
        let store = MemoryStore::new();
        assert_eq!(store.watch_price(7).await.unwrap(), None);

        store
            .set_watch_price(7, WatchPrice::new(300).unwrap())
            .await
            .unwrap();
        store
            .set_watch_price(7, WatchPrice::new(450).unwrap())
            .await
            .unwrap();
        assert_eq!(
            store.watch_price(7).await.unwrap(),
            Some(WatchPrice::new(450).unwrap())
        );
        assert_eq!(store.watchers().await.unwrap().len(), 1);

        store.clear_watch_price(7).await.unwrap();
        assert_eq!(store.watch_price(7).await.unwrap(), None);

        // Clearing an absent user is fine.
        store.clear_watch_price(7).await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_is_fully_replaced() {
        let store = MemoryStore::new();
        store
            .replace_islands(&[island("A", 100), island("B", 200)])
            .await
            .unwrap();
        assert!(store.island("A").await.unwrap().is_some());
        assert!(store.island("B").await.unwrap().is_some());

        store.replace_islands(&[island("C", 300)]).await.unwrap();
        assert!(store.island("A").await.unwrap().is_none());
        assert!(store.island("B").await.unwrap().is_none());
        assert_eq!(store.island("C").await.unwrap().unwrap().turnip_price, 300);
    }
}
