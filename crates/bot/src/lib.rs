//! Telegram front end and update-and-notify task.
//!
//! This crate provides:
//! - HTML message formatting and inline keyboards for islands
//! - The bot command and callback dispatcher
//! - The delivery abstraction with self-healing unsubscribe
//! - The periodic fetch / store / fan-out task

pub mod dispatch;
pub mod message;
pub mod notifier;
pub mod send;

pub use dispatch::{TelegramError, TurnipBot};
pub use notifier::{run_scheduler, Notifier, TaskConfig};
pub use send::{DeliveryError, Messenger, TelegramMessenger};
