//! Environment configuration.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token.
    pub bot_token: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// Time between update runs.
    pub update_interval: Duration,
    /// Delay before the bot starts polling and the first run fires.
    pub startup_delay: Duration,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `BOT_TOKEN` is required. `REDIS_HOST`/`REDIS_PORT`/`REDIS_PASS`
    /// default to a local unauthenticated Redis; `UPDATE_INTERVAL_SECONDS`
    /// defaults to 600 and `INIT_TIME` (startup delay) to 30.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = require("BOT_TOKEN")?;

        let redis_host = optional("REDIS_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let redis_port: u16 = parse_or("REDIS_PORT", 6379)?;
        let redis_url = match optional("REDIS_PASS") {
            Some(pass) => format!("redis://:{pass}@{redis_host}:{redis_port}"),
            None => format!("redis://{redis_host}:{redis_port}"),
        };

        let update_interval = Duration::from_secs(parse_or("UPDATE_INTERVAL_SECONDS", 600)?);
        let startup_delay = Duration::from_secs(parse_or("INIT_TIME", 30)?);

        Ok(Self {
            bot_token,
            redis_url,
            update_interval,
            startup_delay,
        })
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
        }),
        None => Ok(default),
    }
}
