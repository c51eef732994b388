//! Turnip.Exchange marketplace client.
//!
//! This crate provides:
//! - A single-call REST client for the islands endpoint
//! - Boundary validation of the API's untyped island records
//! - The `IslandSource` trait so callers can inject a fake feed in tests

pub mod client;
pub mod error;

pub use client::{IslandSource, TurnipExchangeClient};
pub use error::ApiError;
