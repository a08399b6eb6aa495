//! Command responder - on-demand price replies
//!
//! Consumes inbound messages from the transport poller. A message is
//! answered only when its first word matches the configured command and
//! the sender is on the authorized list; everything else is dropped
//! silently. Replies go through the dispatch queue like any other
//! outbound traffic.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use contracts::{ChatTransport, DeferredRequest, InboundMessage, MarketSource, RelayConfig};
use dispatcher::Dispatcher;
use observability::record_fetch_failure;

/// Counters from a responder run
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponderStats {
    /// Authorized command messages seen
    pub commands: u64,
    /// Commands dropped because the sender was not authorized
    pub unauthorized: u64,
    /// Commands that produced no reply because the fetch failed
    pub fetch_failures: u64,
    /// Replies handed to the dispatcher
    pub replies_enqueued: u64,
}

/// Replies to authorized command messages with a freshly rendered snapshot
pub struct CommandResponder<M, T>
where
    M: MarketSource + Send + Sync + 'static,
    T: ChatTransport + Send + Sync + 'static,
{
    market: Arc<M>,
    dispatcher: Arc<Dispatcher<T>>,
    template: String,
    command: String,
    authorized: HashSet<i64>,
}

impl<M, T> CommandResponder<M, T>
where
    M: MarketSource + Send + Sync + 'static,
    T: ChatTransport + Send + Sync + 'static,
{
    /// Build a responder from configuration
    pub fn new(market: Arc<M>, dispatcher: Arc<Dispatcher<T>>, config: &RelayConfig) -> Self {
        Self {
            market,
            dispatcher,
            template: config.message.template.clone(),
            command: config.message.command_prefix.clone(),
            authorized: config.telegram.admin_ids.iter().copied().collect(),
        }
    }

    /// Run until the inbound channel closes or the shutdown flag flips
    pub async fn run(
        self,
        mut rx: mpsc::Receiver<InboundMessage>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> ResponderStats {
        info!(command = %self.command, admins = self.authorized.len(), "Command responder started");

        let mut stats = ResponderStats::default();

        loop {
            let message = tokio::select! {
                _ = shutdown_rx.changed() => break,
                message = rx.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };
            self.handle(message, &mut stats).await;
        }

        info!(
            commands = stats.commands,
            unauthorized = stats.unauthorized,
            replies = stats.replies_enqueued,
            "Command responder stopped"
        );
        stats
    }

    async fn handle(&self, message: InboundMessage, stats: &mut ResponderStats) {
        if !self.is_command(&message.text) {
            debug!(destination = %message.destination, "Ignoring non-command message");
            return;
        }

        if !self.authorized.contains(&message.from_id) {
            stats.unauthorized += 1;
            debug!(
                from_id = message.from_id,
                destination = %message.destination,
                "Ignoring command from unauthorized sender"
            );
            return;
        }

        stats.commands += 1;

        let snapshot = match self.market.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                stats.fetch_failures += 1;
                record_fetch_failure();
                warn!(error = %e, "Snapshot fetch failed, dropping command reply");
                return;
            }
        };

        let text = template_engine::resolve(&self.template, &snapshot);
        let request = DeferredRequest::send(message.destination, text);
        if let Err(e) = self.dispatcher.enqueue(request) {
            warn!(
                destination = %message.destination,
                error = %e,
                "Failed to enqueue command reply"
            );
            return;
        }
        stats.replies_enqueued += 1;
    }

    /// The first whitespace-separated word must match the command, with an
    /// optional `@botname` mention suffix (`/price@somebot`).
    fn is_command(&self, text: &str) -> bool {
        let Some(first) = text.split_whitespace().next() else {
            return false;
        };
        match first.split_once('@') {
            Some((bare, _)) => bare == self.command,
            None => first == self.command,
        }
    }
}
