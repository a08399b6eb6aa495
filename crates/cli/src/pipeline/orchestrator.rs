//! Relay orchestrator - wires all components together.
//!
//! Builds the transport, market client and dispatcher, spawns the poller,
//! responder and scheduler, then waits for a shutdown signal. Shutdown
//! drains every destination queue before returning.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use contracts::{DeferredRequest, Destination, RelayConfig};
use dispatcher::Dispatcher;
use market_data::MarketClient;
use observability::{record_destination_totals, record_queue_depth};
use relay::{CommandResponder, UpdateScheduler};
use transport::{TelegramClient, UpdatePoller};

use super::RelayStats;

/// Startup notice sent to every admin chat
const STARTUP_NOTICE: &str = "Bot restarted";

/// Spacing between Prometheus gauge flushes
const METRICS_FLUSH_INTERVAL: Duration = Duration::from_secs(15);

/// Relay run options
#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// The relay configuration
    pub config: RelayConfig,

    /// Relay timeout (None = run until the shutdown signal)
    pub timeout: Option<Duration>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main relay orchestrator
pub struct Relay {
    options: RelayOptions,
}

impl Relay {
    /// Create a new relay with the given options
    pub fn new(options: RelayOptions) -> Self {
        Self { options }
    }

    /// Run the relay until `shutdown` resolves (or the timeout elapses)
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<RelayStats> {
        let start_time = Instant::now();
        let config = &self.options.config;

        // Initialize metrics (optional)
        if let Some(port) = self.options.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Build components
        let telegram = Arc::new(TelegramClient::new(
            &config.telegram.api_url,
            &config.telegram.token,
        ));
        let market = Arc::new(MarketClient::new(config.data.url.clone()));
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&telegram), &config.dispatch));

        info!(
            targets = config.schedule.targets.len(),
            min_send_interval_ms = config.dispatch.min_send_interval_ms,
            "Dispatcher ready"
        );

        // Startup notice to admin chats, through the same queues as
        // everything else
        for admin_id in &config.telegram.admin_ids {
            let request = DeferredRequest::send(Destination::chat(*admin_id), STARTUP_NOTICE);
            if let Err(e) = dispatcher.enqueue(request) {
                warn!(admin_id, error = %e, "Failed to enqueue startup notice");
            }
        }

        // Inbound side: long-poll loop feeding the responder
        let mut poller = UpdatePoller::spawn(Arc::clone(&telegram), config.dispatch.queue_capacity);
        let inbound_rx = poller
            .take_receiver()
            .context("Poller receiver already taken")?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let scheduler = UpdateScheduler::new(Arc::clone(&market), Arc::clone(&dispatcher), config);
        let responder = CommandResponder::new(market, Arc::clone(&dispatcher), config);

        let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx.clone()));
        let responder_task = tokio::spawn(responder.run(inbound_rx, shutdown_rx));

        info!("Relay running");

        // Wait for shutdown, flushing gauges along the way
        self.wait_for_shutdown(shutdown, &dispatcher).await;

        // Graceful shutdown: stop producers first, then drain the queues
        info!("Shutting down relay...");
        let _ = shutdown_tx.send(true);
        poller.stop().await;

        let scheduler_stats = join_or_default(scheduler_task, "scheduler").await;
        let responder_stats = join_or_default(responder_task, "responder").await;

        let dispatcher = Arc::try_unwrap(dispatcher)
            .map_err(|_| anyhow::anyhow!("Dispatcher still referenced during shutdown"))?;
        let destinations = dispatcher.shutdown().await;

        let stats = RelayStats {
            duration: start_time.elapsed(),
            scheduler: scheduler_stats,
            responder: responder_stats,
            destinations,
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            "Relay shutdown complete"
        );

        Ok(stats)
    }

    /// Block until the shutdown signal or the configured timeout, flushing
    /// dispatcher gauges into Prometheus on a fixed cadence
    async fn wait_for_shutdown<T>(
        &self,
        shutdown: impl Future<Output = ()>,
        dispatcher: &Dispatcher<T>,
    ) where
        T: contracts::ChatTransport + Send + Sync + 'static,
    {
        tokio::pin!(shutdown);

        let deadline = self.options.timeout.map(|t| Instant::now() + t);
        let mut flush = tokio::time::interval(METRICS_FLUSH_INTERVAL);
        flush.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            let timeout_wait = async {
                match deadline {
                    Some(deadline) => {
                        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
                    }
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping relay...");
                    break;
                }
                _ = timeout_wait => {
                    warn!(timeout_secs = ?self.options.timeout.map(|t| t.as_secs()), "Relay timed out");
                    break;
                }
                _ = flush.tick() => {
                    flush_gauges(dispatcher);
                }
            }
        }
    }
}

/// Mirror dispatcher counters into Prometheus gauges
fn flush_gauges<T>(dispatcher: &Dispatcher<T>)
where
    T: contracts::ChatTransport + Send + Sync + 'static,
{
    for (destination, snapshot) in dispatcher.metrics() {
        let label = destination.to_string();
        record_queue_depth(&label, snapshot.queue_len);
        record_destination_totals(
            &label,
            snapshot.sent_count,
            snapshot.failure_count,
            snapshot.dropped_count,
        );
    }
}

/// Await a stats task, falling back to defaults if it panicked
async fn join_or_default<S: Default>(task: JoinHandle<S>, name: &'static str) -> S {
    match task.await {
        Ok(stats) => stats,
        Err(e) => {
            error!(task = name, error = ?e, "Task panicked, stats lost");
            S::default()
        }
    }
}
