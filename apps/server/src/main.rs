//! Turnip Exchange Notifier Bot - headless server.
//!
//! Wires the marketplace client, the Redis store and the Telegram bot
//! together, then runs the command dispatcher alongside the periodic
//! update-and-notify task.

mod config;

use clap::Parser;
use config::AppConfig;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use turnip_api::TurnipExchangeClient;
use turnip_bot::{run_scheduler, Notifier, TaskConfig, TelegramMessenger, TurnipBot};
use turnip_store::RedisStore;

/// Turnip Exchange Notifier Bot CLI
#[derive(Parser, Debug)]
#[command(name = "turnip-bot")]
#[command(about = "Telegram notifier for Turnip.Exchange island prices", long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = AppConfig::from_env()?;

    if !config.startup_delay.is_zero() {
        info!(
            delay_secs = config.startup_delay.as_secs(),
            "Waiting before startup"
        );
        tokio::time::sleep(config.startup_delay).await;
    }

    info!("Connecting to Redis");
    let store = Arc::new(RedisStore::connect(&config.redis_url).await?);

    let bot = Arc::new(TurnipBot::new(&config.bot_token, store.clone()));
    let notifier = Arc::new(Notifier::new(
        store,
        Arc::new(TurnipExchangeClient::new()),
        Arc::new(TelegramMessenger::new(bot.bot().clone())),
    ));

    tokio::spawn(run_scheduler(
        notifier,
        TaskConfig {
            interval: config.update_interval,
            run_on_start: true,
        },
    ));

    info!("===== Bot started =====");
    info!(
        interval_secs = config.update_interval.as_secs(),
        "Current update interval"
    );
    bot.run().await;

    Ok(())
}
