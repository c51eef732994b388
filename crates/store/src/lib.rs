//! Watcher preferences and island snapshot storage.
//!
//! This crate provides:
//! - The [`WatchStore`] trait the bot and notify task are written against
//! - A Redis backend for production (hashes `users` and `islands`)
//! - An in-memory backend for tests and Redis-less local runs

pub mod db;
pub mod error;
pub mod memory;
pub mod store;

pub use db::RedisStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::WatchStore;
