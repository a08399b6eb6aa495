//! Periodic update scheduler
//!
//! One background task on a fixed-interval clock. A tick is all-or-nothing:
//! if the snapshot fetch fails, the whole tick is skipped and no edit is
//! issued; per-target failures are the dispatcher's business and never
//! abort the remaining targets.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use contracts::{ChatTransport, DeferredRequest, MarketSource, RelayConfig, UpdateTarget};
use dispatcher::Dispatcher;
use observability::{record_fetch_failure, record_tick};

/// Counters from a scheduler run
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerStats {
    /// Ticks that fetched and enqueued edits
    pub ticks: u64,
    /// Ticks skipped because the fetch failed
    pub fetch_failures: u64,
    /// Edits handed to the dispatcher
    pub edits_enqueued: u64,
}

/// Fixed-interval snapshot-to-edits scheduler
pub struct UpdateScheduler<M, T>
where
    M: MarketSource + Send + Sync + 'static,
    T: ChatTransport + Send + Sync + 'static,
{
    market: Arc<M>,
    dispatcher: Arc<Dispatcher<T>>,
    template: String,
    interval: Duration,
    targets: Vec<UpdateTarget>,
}

impl<M, T> UpdateScheduler<M, T>
where
    M: MarketSource + Send + Sync + 'static,
    T: ChatTransport + Send + Sync + 'static,
{
    /// Build a scheduler from configuration
    pub fn new(market: Arc<M>, dispatcher: Arc<Dispatcher<T>>, config: &RelayConfig) -> Self {
        Self {
            market,
            dispatcher,
            template: config.message.template.clone(),
            interval: Duration::from_secs(config.schedule.interval_secs),
            targets: config.schedule.targets.clone(),
        }
    }

    /// Run until the shutdown flag flips
    ///
    /// The first tick fires one full interval after start, matching the
    /// upstream ticker behavior.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> SchedulerStats {
        info!(
            interval_secs = self.interval.as_secs(),
            targets = self.targets.len(),
            "Update scheduler started"
        );

        let mut stats = SchedulerStats::default();
        let mut clock =
            tokio::time::interval_at(tokio::time::Instant::now() + self.interval, self.interval);
        clock.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = clock.tick() => self.tick(&mut stats).await,
            }
        }

        info!(
            ticks = stats.ticks,
            fetch_failures = stats.fetch_failures,
            edits = stats.edits_enqueued,
            "Update scheduler stopped"
        );
        stats
    }

    /// One tick: fetch, render once, enqueue one edit per target
    async fn tick(&self, stats: &mut SchedulerStats) {
        let snapshot = match self.market.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                stats.fetch_failures += 1;
                record_fetch_failure();
                warn!(error = %e, "Snapshot fetch failed, skipping tick");
                return;
            }
        };

        stats.ticks += 1;
        record_tick();

        let rendered = template_engine::resolve(&self.template, &snapshot);
        let text = stamp(&rendered);

        for target in &self.targets {
            let request =
                DeferredRequest::edit(target.destination(), target.message_id, text.clone());
            if let Err(e) = self.dispatcher.enqueue(request) {
                warn!(
                    destination = %target.destination(),
                    message_id = target.message_id,
                    error = %e,
                    "Failed to enqueue scheduled edit"
                );
                continue;
            }
            stats.edits_enqueued += 1;
        }

        debug!(targets = self.targets.len(), "Tick complete");
    }
}

/// Append a UTC timestamp line so repeated edits stay distinguishable
/// (the platform rejects edits whose text is unchanged).
fn stamp(text: &str) -> String {
    format!("{text}\n{}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"))
}
