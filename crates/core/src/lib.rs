//! Core data types for the turnip notifier bot.

pub mod island;
pub mod watch;

pub use island::*;
pub use watch::*;
