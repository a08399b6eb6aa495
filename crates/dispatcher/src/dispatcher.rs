//! Dispatcher - lazy per-destination queue registry
//!
//! The registry is the only shared mutable state: a `Destination ->
//! DestinationHandle` map behind one reader/writer lock. Lookups of an
//! existing queue take the read lock; creating a destination takes the
//! write lock. Everything past the registry is per-destination.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info};

use contracts::{ChatTransport, DeferredRequest, Destination, DispatchConfig};

use crate::error::DispatchError;
use crate::handle::DestinationHandle;
use crate::metrics::MetricsSnapshot;

/// Per-destination rate-limited dispatcher
pub struct Dispatcher<T>
where
    T: ChatTransport + Send + Sync + 'static,
{
    transport: Arc<T>,
    min_interval: Duration,
    queue_capacity: usize,
    idle_ttl: Duration,
    registry: RwLock<HashMap<Destination, DestinationHandle>>,
}

impl<T> Dispatcher<T>
where
    T: ChatTransport + Send + Sync + 'static,
{
    /// Create a dispatcher over the given transport
    pub fn new(transport: Arc<T>, config: &DispatchConfig) -> Self {
        Self {
            transport,
            min_interval: Duration::from_millis(config.min_send_interval_ms),
            queue_capacity: config.queue_capacity,
            idle_ttl: Duration::from_secs(config.idle_ttl_secs),
            registry: RwLock::new(HashMap::new()),
        }
    }

    /// Enqueue an outbound request (non-blocking)
    ///
    /// The destination's queue and worker are created on first use, retired
    /// after the idle TTL and respawned on the next enqueue. Delivery is
    /// asynchronous; the outcome arrives on the request's completion channel.
    pub fn enqueue(&self, request: DeferredRequest) -> Result<(), DispatchError> {
        let destination = request.destination;

        // Fast path: live destination under the read lock
        {
            let registry = self
                .registry
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(handle) = registry.get(&destination) {
                if !handle.is_stale() {
                    return handle.try_send(request);
                }
            }
        }

        // Slow path: create or replace the destination under the write lock.
        // Another producer may have won the race, hence the re-check.
        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if registry
            .get(&destination)
            .is_some_and(DestinationHandle::is_stale)
        {
            debug!(destination = %destination, "Replacing retired destination worker");
            if let Some(old) = registry.remove(&destination) {
                old.reap();
            }
        }
        let handle = registry.entry(destination).or_insert_with(|| {
            debug!(destination = %destination, "Creating destination worker");
            DestinationHandle::spawn(
                Arc::clone(&self.transport),
                destination,
                self.min_interval,
                self.queue_capacity,
                self.idle_ttl,
            )
        });
        handle.try_send(request)
    }

    /// Number of active destinations
    pub fn destination_count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Get metrics for all destinations
    pub fn metrics(&self) -> Vec<(Destination, MetricsSnapshot)> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|h| (h.destination(), h.metrics().snapshot()))
            .collect()
    }

    /// Shutdown all destination workers, returning their final metrics
    ///
    /// Each worker drains its already-queued requests (still rate-limited)
    /// before exiting; new enqueues are impossible once the dispatcher is
    /// consumed.
    pub async fn shutdown(self) -> Vec<(Destination, MetricsSnapshot)> {
        let registry = self
            .registry
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let count = registry.len();

        let mut snapshots = Vec::with_capacity(count);
        for (destination, handle) in registry {
            snapshots.push((destination, handle.shutdown().await));
        }

        info!(destinations = count, "Dispatcher shutdown complete");
        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MessageRef, RelayError};
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Default)]
    struct MockTransport {
        sends: Mutex<Vec<(Destination, String, Instant)>>,
    }

    impl ChatTransport for MockTransport {
        async fn send_message(
            &self,
            destination: Destination,
            text: &str,
        ) -> Result<MessageRef, RelayError> {
            let mut sends = self.sends.lock().unwrap();
            sends.push((destination, text.to_string(), Instant::now()));
            Ok(MessageRef {
                chat_id: destination.chat_id,
                message_id: sends.len() as i64,
            })
        }

        async fn edit_message(
            &self,
            destination: Destination,
            _message_id: i64,
            text: &str,
        ) -> Result<(), RelayError> {
            self.sends
                .lock()
                .unwrap()
                .push((destination, text.to_string(), Instant::now()));
            Ok(())
        }
    }

    fn config(min_ms: u64) -> DispatchConfig {
        DispatchConfig {
            min_send_interval_ms: min_ms,
            queue_capacity: 32,
            idle_ttl_secs: 0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lazy_destination_creation() {
        let transport = Arc::new(MockTransport::default());
        let dispatcher = Dispatcher::new(Arc::clone(&transport), &config(1));

        assert_eq!(dispatcher.destination_count(), 0);

        dispatcher
            .enqueue(DeferredRequest::send(Destination::chat(1), "a"))
            .unwrap();
        dispatcher
            .enqueue(DeferredRequest::send(Destination::chat(1), "b"))
            .unwrap();
        dispatcher
            .enqueue(DeferredRequest::send(Destination::thread(1, 9), "c"))
            .unwrap();

        assert_eq!(dispatcher.destination_count(), 2);
        dispatcher.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cross_destination_independence() {
        let transport = Arc::new(MockTransport::default());
        let dispatcher = Dispatcher::new(Arc::clone(&transport), &config(60_000));

        // One slow destination must not delay another
        dispatcher
            .enqueue(DeferredRequest::send(Destination::chat(1), "first-1"))
            .unwrap();
        dispatcher
            .enqueue(DeferredRequest::send(Destination::chat(1), "second-1"))
            .unwrap();
        dispatcher
            .enqueue(DeferredRequest::send(Destination::chat(2), "first-2"))
            .unwrap();

        // Both first sends go out without waiting for chat 1's second slot
        tokio::time::sleep(Duration::from_millis(10)).await;
        {
            let sends = transport.sends.lock().unwrap();
            let texts: Vec<&str> = sends.iter().map(|(_, t, _)| t.as_str()).collect();
            assert!(texts.contains(&"first-1"));
            assert!(texts.contains(&"first-2"));
            assert!(!texts.contains(&"second-1"));
        }

        dispatcher.shutdown().await;

        // Shutdown drained the delayed request too
        let sends = transport.sends.lock().unwrap();
        assert!(sends.iter().any(|(_, t, _)| t == "second-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_producers_share_one_clock() {
        let transport = Arc::new(MockTransport::default());
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&transport), &config(50)));
        let destination = Destination::chat(7);

        let mut producers = Vec::new();
        for i in 0..4 {
            let dispatcher = Arc::clone(&dispatcher);
            producers.push(tokio::spawn(async move {
                dispatcher
                    .enqueue(DeferredRequest::send(destination, format!("p{i}")))
                    .unwrap();
            }));
        }
        for p in producers {
            p.await.unwrap();
        }

        match Arc::try_unwrap(dispatcher) {
            Ok(dispatcher) => dispatcher.shutdown().await,
            Err(_) => panic!("dispatcher still shared"),
        };

        let sends = transport.sends.lock().unwrap();
        assert_eq!(sends.len(), 4);
        for pair in sends.windows(2) {
            let gap = pair[1].2 - pair[0].2;
            assert!(gap >= Duration::from_millis(50), "gap too small: {gap:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_worker_retires_and_respawns() {
        let transport = Arc::new(MockTransport::default());
        let dispatcher = Dispatcher::new(
            Arc::clone(&transport),
            &DispatchConfig {
                min_send_interval_ms: 1,
                queue_capacity: 32,
                idle_ttl_secs: 10,
            },
        );
        let destination = Destination::chat(5);

        dispatcher
            .enqueue(DeferredRequest::send(destination, "before"))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Past the TTL the worker is gone; the registry still holds the
        // stale handle until the next enqueue replaces it
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(dispatcher.destination_count(), 1);

        dispatcher
            .enqueue(DeferredRequest::send(destination, "after"))
            .unwrap();
        dispatcher.shutdown().await;

        let sends = transport.sends.lock().unwrap();
        let texts: Vec<&str> = sends.iter().map(|(_, t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["before", "after"]);
    }
}
