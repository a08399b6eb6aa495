//! DestinationHandle - one destination's queue and worker task
//!
//! The worker owns the destination's rate-limit clock, so pacing needs no
//! shared state: requests are delivered strictly in enqueue order, one at a
//! time, with at least the configured minimum interval between sends.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use contracts::{ChatTransport, DeferredRequest, Destination, MessageRef, OutboundMethod, RelayError};

use crate::error::DispatchError;
use crate::metrics::{DestinationMetrics, MetricsSnapshot};

/// Handle to a running destination worker
pub struct DestinationHandle {
    /// Queue key
    destination: Destination,
    /// Channel to hand requests to the worker
    tx: mpsc::Sender<DeferredRequest>,
    /// Bounded queue depth
    capacity: usize,
    /// Shared metrics
    metrics: Arc<DestinationMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl DestinationHandle {
    /// Create a new handle and spawn its worker task
    pub fn spawn<T>(
        transport: Arc<T>,
        destination: Destination,
        min_interval: Duration,
        capacity: usize,
        idle_ttl: Duration,
    ) -> Self
    where
        T: ChatTransport + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity);
        let metrics = Arc::new(DestinationMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_handle = tokio::spawn(async move {
            destination_worker(
                transport,
                rx,
                destination,
                min_interval,
                idle_ttl,
                worker_metrics,
            )
            .await;
        });

        Self {
            destination,
            tx,
            capacity,
            metrics,
            worker_handle,
        }
    }

    /// Get destination key
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Whether the worker has retired (idle TTL) and the handle must be
    /// replaced before the destination can accept traffic again
    pub fn is_stale(&self) -> bool {
        self.tx.is_closed()
    }

    /// Reap a replaced handle in the background
    ///
    /// Used when a retired worker is swapped out under the registry lock,
    /// where awaiting is not an option.
    pub fn reap(self) {
        tokio::spawn(async move {
            let _ = self.shutdown().await;
        });
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<DestinationMetrics> {
        &self.metrics
    }

    /// Hand a request to the worker (non-blocking)
    ///
    /// On refusal the request's completion channel is notified before the
    /// error is returned, so producers never wait on a dead oneshot.
    pub fn try_send(&self, request: DeferredRequest) -> Result<(), DispatchError> {
        match self.tx.try_send(request) {
            Ok(()) => {
                self.metrics
                    .set_queue_len(self.capacity.saturating_sub(self.tx.capacity()));
                Ok(())
            }
            Err(mpsc::error::TrySendError::Full(request)) => {
                self.metrics.inc_dropped_count();
                warn!(
                    destination = %self.destination,
                    method = request.method.name(),
                    "Queue full, request refused"
                );
                request.complete(Err(RelayError::transport(
                    self.destination,
                    "dispatch queue full",
                )));
                Err(DispatchError::QueueFull {
                    destination: self.destination,
                })
            }
            Err(mpsc::error::TrySendError::Closed(request)) => {
                error!(destination = %self.destination, "Destination worker closed unexpectedly");
                request.complete(Err(RelayError::transport(
                    self.destination,
                    "destination worker closed",
                )));
                Err(DispatchError::WorkerClosed {
                    destination: self.destination,
                })
            }
        }
    }

    /// Shutdown the worker gracefully, returning its final metrics
    ///
    /// Dropping the sender lets the worker drain already-queued requests
    /// (still rate-limited) and exit.
    pub async fn shutdown(self) -> MetricsSnapshot {
        drop(self.tx);
        if let Err(e) = self.worker_handle.await {
            error!(destination = %self.destination, error = ?e, "Worker task panicked");
        }
        debug!(destination = %self.destination, "DestinationHandle shutdown complete");
        self.metrics.snapshot()
    }
}

/// Worker task: pop requests, wait out the rate-limit window, call the
/// transport, report the outcome. `Idle -> Sending -> Idle`; a transport
/// failure is reported and the worker moves on to the next request.
///
/// A non-zero `idle_ttl` retires the worker after that much time without
/// traffic; the dispatcher respawns it on the next enqueue.
async fn destination_worker<T: ChatTransport>(
    transport: Arc<T>,
    mut rx: mpsc::Receiver<DeferredRequest>,
    destination: Destination,
    min_interval: Duration,
    idle_ttl: Duration,
    metrics: Arc<DestinationMetrics>,
) {
    debug!(destination = %destination, "Destination worker started");

    let mut last_send: Option<Instant> = None;

    loop {
        let request = if idle_ttl.is_zero() {
            rx.recv().await
        } else {
            match tokio::time::timeout(idle_ttl, rx.recv()).await {
                Ok(request) => request,
                Err(_) => {
                    debug!(destination = %destination, "Destination worker retiring after idle TTL");
                    // Stop accepting, then keep looping: recv yields any
                    // request that slipped in before the close, then None
                    rx.close();
                    continue;
                }
            }
        };
        let Some(request) = request else { break };
        metrics.set_queue_len(rx.len());

        if let Some(prev) = last_send {
            let elapsed = prev.elapsed();
            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }

        let outcome = match request.method {
            OutboundMethod::SendMessage => {
                transport.send_message(request.destination, &request.text).await
            }
            OutboundMethod::EditMessage { message_id } => transport
                .edit_message(request.destination, message_id, &request.text)
                .await
                .map(|()| MessageRef {
                    chat_id: request.destination.chat_id,
                    message_id,
                }),
        };
        last_send = Some(Instant::now());

        match &outcome {
            Ok(message) => {
                metrics.inc_sent_count();
                debug!(
                    destination = %destination,
                    method = request.method.name(),
                    message_id = message.message_id,
                    "Request delivered"
                );
            }
            Err(e) => {
                metrics.inc_failure_count();
                warn!(
                    destination = %destination,
                    method = request.method.name(),
                    error = %e,
                    "Send failed"
                );
                // No retry; the destination returns to idle for the next request
            }
        }

        request.complete(outcome);
    }

    debug!(destination = %destination, "Destination worker stopped");
}
