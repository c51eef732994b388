//! The update-and-notify task.
//!
//! One run is a straight line: load watchers, fetch islands, persist the
//! snapshot, fan out to every watcher whose threshold is met. Any failure
//! aborts or degrades the current run only; the next tick starts fresh.

use crate::message::{details_keyboard, matches_message};
use crate::send::Messenger;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use turnip_api::IslandSource;
use turnip_core::{no_islands, Island};
use turnip_store::WatchStore;

/// Scheduling knobs for the update task.
#[derive(Debug, Clone)]
pub struct TaskConfig {
    /// Time between runs.
    pub interval: Duration,
    /// Run once immediately when the scheduler starts.
    pub run_on_start: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
            run_on_start: true,
        }
    }
}

/// Fetch / store / fan-out orchestrator.
///
/// All three collaborators are injected, so runs are testable against the
/// in-memory store and fake source/messenger implementations.
pub struct Notifier {
    store: Arc<dyn WatchStore>,
    source: Arc<dyn IslandSource>,
    messenger: Arc<dyn Messenger>,
}

impl Notifier {
    pub fn new(
        store: Arc<dyn WatchStore>,
        source: Arc<dyn IslandSource>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            store,
            source,
            messenger,
        }
    }

    /// Execute one update run. Never returns an error: every failure mode
    /// is logged and absorbed here, because there is no caller that could
    /// do anything better with it.
    pub async fn run_once(&self) {
        debug!("===== Updating islands =====");

        let watchers = match self.store.watchers().await {
            Ok(watchers) => watchers,
            Err(e) => {
                error!(error = %e, "Failed to load watchers, skipping run");
                return;
            }
        };

        // Nobody is watching: skip the API call entirely.
        if watchers.is_empty() {
            debug!("No watchers, skipping fetch");
            return;
        }

        let islands = match self.source.fetch_islands().await {
            Ok(islands) => islands,
            Err(e) => {
                if e.is_transient() {
                    warn!(error = %e, "Fetch failed, will retry next tick");
                } else {
                    error!(error = %e, "Fetch returned malformed data");
                }
                return;
            }
        };

        // The "No Islands" placeholder means an empty marketplace. The
        // prior snapshot is left intact so detail buttons on messages
        // already sent keep working.
        if no_islands(&islands) {
            debug!("No islands found");
            return;
        }

        if let Err(e) = self.store.replace_islands(&islands).await {
            error!(error = %e, "Failed to persist snapshot, skipping fan-out");
            return;
        }
        debug!(count = islands.len(), "Islands updated");

        let mut sends = Vec::new();
        for (&chat_id, &price) in &watchers {
            let matches: Vec<&Island> = islands
                .iter()
                .filter(|island| price.matches(island.turnip_price))
                .collect();

            // Silence is the normal outcome for a watcher with no matches.
            if matches.is_empty() {
                continue;
            }

            let text = matches_message(&matches);
            let keyboard = details_keyboard(&matches);
            debug!(chat_id, matches = matches.len(), "Sending islands");

            let messenger = Arc::clone(&self.messenger);
            sends.push(async move {
                let result = messenger.send_matches(chat_id, &text, keyboard).await;
                (chat_id, result)
            });
        }

        // Dispatches are independent; one failure never blocks the rest.
        for (chat_id, result) in join_all(sends).await {
            match result {
                Ok(()) => {}
                Err(e) if e.is_unreachable() => {
                    info!(chat_id, error = %e, "Recipient gone, unsubscribing");
                    if let Err(e) = self.store.clear_watch_price(chat_id).await {
                        error!(chat_id, error = %e, "Failed to unsubscribe recipient");
                    }
                }
                Err(e) => {
                    error!(chat_id, error = %e, "Failed to send islands");
                }
            }
        }
    }
}

/// Drive the notifier on a fixed interval.
///
/// Runs execute sequentially inside this loop; combined with
/// `MissedTickBehavior::Skip` that means a run longer than the interval
/// skips ticks instead of overlapping the next run.
pub async fn run_scheduler(notifier: Arc<Notifier>, config: TaskConfig) {
    info!(
        interval_secs = config.interval.as_secs(),
        run_on_start = config.run_on_start,
        "Starting update task"
    );

    if config.run_on_start {
        notifier.run_once().await;
    }

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of a fresh interval completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        notifier.run_once().await;
    }
}
