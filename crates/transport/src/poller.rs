//! Update poller - long-poll loop feeding a message channel
//!
//! One background task repeatedly calls `getUpdates` and forwards inbound
//! messages over a bounded channel. Poll failures are logged and retried
//! after a short pause; the loop stops on the shutdown flag.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use contracts::InboundMessage;

use crate::telegram::TelegramClient;

/// Long-poll wait passed to the Bot API
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause before retrying after a poll failure
const POLL_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Handle to the running poller task
pub struct UpdatePoller {
    rx: Option<mpsc::Receiver<InboundMessage>>,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl UpdatePoller {
    /// Spawn the poll loop
    pub fn spawn(client: Arc<TelegramClient>, channel_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(channel_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            poll_loop(client, tx, shutdown_rx).await;
        });

        Self {
            rx: Some(rx),
            shutdown_tx,
            task,
        }
    }

    /// Take the inbound message receiver (once)
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<InboundMessage>> {
        self.rx.take()
    }

    /// Stop the poll loop and wait for it to finish
    pub async fn stop(self) {
        // Poller may already be gone if the runtime is tearing down
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = ?e, "Poller task panicked");
        }
        debug!("Update poller stopped");
    }
}

async fn poll_loop(
    client: Arc<TelegramClient>,
    tx: mpsc::Sender<InboundMessage>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    debug!("Update poller started");

    let mut offset = 0i64;

    loop {
        let batch = tokio::select! {
            _ = shutdown_rx.changed() => break,
            batch = client.get_updates(offset, POLL_TIMEOUT_SECS) => batch,
        };

        match batch {
            Ok((messages, next_offset)) => {
                offset = next_offset;
                for message in messages {
                    if tx.send(message).await.is_err() {
                        // Consumer gone; nothing left to poll for
                        debug!("Inbound channel closed, stopping poller");
                        return;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "getUpdates failed, retrying");
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                }
            }
        }
    }

    debug!("Update poller stopped on shutdown flag");
}
