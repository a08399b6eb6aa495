//! # Integration Tests
//!
//! End-to-end tests over the mock transport and a mock market source.
//!
//! Covers:
//! - Config-to-delivery flow (scheduler and responder)
//! - Per-destination pacing under concurrent producers
//! - Graceful shutdown draining

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let destination = contracts::Destination::thread(-100, 7);
        assert_eq!(destination.to_string(), "-100_7");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{
        DeferredRequest, Destination, InboundMessage, MarketSnapshot, MarketSource, RelayConfig,
        RelayError,
    };
    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::Dispatcher;
    use relay::{CommandResponder, UpdateScheduler};
    use serde_json::json;
    use tokio::sync::{mpsc, watch};
    use transport::MockTransport;

    const CONFIG_TOML: &str = r#"
[telegram]
token = "123456:TESTTOKEN"
admin_ids = [42]

[data]
url = "https://api.geckoterminal.com/api/v2/networks/base/pools/0xabc"

[message]
template = "E{data.attributes.price_change_percentage.m5} S{data.attributes.name}: F{data.attributes.base_token_price_usd}"

[schedule]
interval_secs = 30

[[schedule.targets]]
chat_id = -1001
message_id = 10

[[schedule.targets]]
chat_id = -1002
thread_id = 3
message_id = 20

[dispatch]
min_send_interval_ms = 100
queue_capacity = 16
"#;

    /// Snapshot shaped like the real pool endpoint
    struct MockMarket {
        failing: AtomicBool,
    }

    impl MockMarket {
        fn new() -> Self {
            Self {
                failing: AtomicBool::new(false),
            }
        }
    }

    impl MarketSource for MockMarket {
        async fn fetch(&self) -> Result<MarketSnapshot, RelayError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(RelayError::fetch("mock://", "mock outage"));
            }
            Ok(MarketSnapshot::new(json!({
                "data": {
                    "attributes": {
                        "name": "TEST / WETH",
                        "base_token_price_usd": "0.042",
                        "price_change_percentage": { "m5": "7.5" }
                    }
                }
            })))
        }
    }

    fn load_config() -> RelayConfig {
        ConfigLoader::load_from_str(CONFIG_TOML, ConfigFormat::Toml).unwrap()
    }

    /// Config -> scheduler -> dispatcher -> transport: every target receives
    /// a rendered edit with the expected template output.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_scheduled_updates() {
        let config = load_config();
        let transport = Arc::new(MockTransport::new());
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&transport), &config.dispatch));
        let scheduler =
            UpdateScheduler::new(Arc::new(MockMarket::new()), Arc::clone(&dispatcher), &config);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let run = tokio::spawn(scheduler.run(shutdown_rx));

        tokio::time::sleep(Duration::from_secs(31)).await;
        shutdown_tx.send(true).unwrap();
        let stats = run.await.unwrap();

        assert_eq!(stats.ticks, 1);
        assert_eq!(stats.edits_enqueued, 2);

        match Arc::try_unwrap(dispatcher) {
            Ok(dispatcher) => dispatcher.shutdown().await,
            Err(_) => panic!("dispatcher still shared"),
        };

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|r| r.method == "editMessageText"));
        assert!(sent
            .iter()
            .any(|r| r.destination == Destination::chat(-1001) && r.message_id == 10));
        assert!(sent
            .iter()
            .any(|r| r.destination == Destination::thread(-1002, 3) && r.message_id == 20));

        // Rendered body: sentiment, raw name, humanized price, then the
        // timestamp line appended by the scheduler
        let body = sent[0].text.lines().next().unwrap();
        assert_eq!(body, "🚀 TEST / WETH: $0.042");
    }

    /// Inbound command -> responder -> dispatcher -> transport, with auth
    /// checks along the way.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_command_reply() {
        let config = load_config();
        let transport = Arc::new(MockTransport::new());
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&transport), &config.dispatch));
        let responder = CommandResponder::new(
            Arc::new(MockMarket::new()),
            Arc::clone(&dispatcher),
            &config,
        );

        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let origin = Destination::chat(-555);
        for (from_id, text) in [(42, "/price"), (7, "/price"), (42, "not a command")] {
            tx.send(InboundMessage {
                destination: origin,
                from_id,
                message_id: 1,
                text: text.to_string(),
            })
            .await
            .unwrap();
        }
        drop(tx);

        let stats = responder.run(rx, shutdown_rx).await;
        assert_eq!(stats.commands, 1);
        assert_eq!(stats.unauthorized, 1);
        assert_eq!(stats.replies_enqueued, 1);

        match Arc::try_unwrap(dispatcher) {
            Ok(dispatcher) => dispatcher.shutdown().await,
            Err(_) => panic!("dispatcher still shared"),
        };

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, "sendMessage");
        assert_eq!(sent[0].destination, origin);
        assert_eq!(sent[0].text, "🚀 TEST / WETH: $0.042");
    }

    /// Scheduler edits and responder sends to the same destination share one
    /// pacing clock.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_shared_destination_pacing() {
        let config = load_config();
        let transport = Arc::new(MockTransport::new());
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&transport), &config.dispatch));
        let destination = Destination::chat(-1001);

        // Mixed producers hitting one destination
        dispatcher
            .enqueue(DeferredRequest::edit(destination, 10, "tick"))
            .unwrap();
        dispatcher
            .enqueue(DeferredRequest::send(destination, "reply"))
            .unwrap();
        dispatcher
            .enqueue(DeferredRequest::edit(destination, 10, "tick again"))
            .unwrap();

        match Arc::try_unwrap(dispatcher) {
            Ok(dispatcher) => dispatcher.shutdown().await,
            Err(_) => panic!("dispatcher still shared"),
        };

        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        // FIFO across methods
        assert_eq!(sent[0].text, "tick");
        assert_eq!(sent[1].text, "reply");
        assert_eq!(sent[2].text, "tick again");
        // 100ms spacing from the shared clock
        for pair in sent.windows(2) {
            let gap = pair[1].at - pair[0].at;
            assert!(gap >= Duration::from_millis(100), "gap too small: {gap:?}");
        }
    }

    /// A failed fetch must leave the transport untouched; recovery on the
    /// next tick works without restarting anything.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_fetch_outage_and_recovery() {
        let config = load_config();
        let transport = Arc::new(MockTransport::new());
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&transport), &config.dispatch));
        let market = Arc::new(MockMarket::new());
        market.failing.store(true, Ordering::SeqCst);

        let scheduler =
            UpdateScheduler::new(Arc::clone(&market), Arc::clone(&dispatcher), &config);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let run = tokio::spawn(scheduler.run(shutdown_rx));

        // First tick fails, nothing goes out
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(transport.sent_count(), 0);

        // Source recovers before the second tick
        market.failing.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;

        shutdown_tx.send(true).unwrap();
        let stats = run.await.unwrap();
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.ticks, 1);

        match Arc::try_unwrap(dispatcher) {
            Ok(dispatcher) => dispatcher.shutdown().await,
            Err(_) => panic!("dispatcher still shared"),
        };
        assert_eq!(transport.sent_count(), 2);
    }

    /// Shutdown drains queued requests instead of dropping them.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_shutdown_drains_queues() {
        let config = load_config();
        let transport = Arc::new(MockTransport::new());
        let dispatcher = Dispatcher::new(Arc::clone(&transport), &config.dispatch);

        for i in 0..5 {
            dispatcher
                .enqueue(DeferredRequest::send(
                    Destination::chat(-9),
                    format!("queued-{i}"),
                ))
                .unwrap();
        }

        // Nothing has had time to drain yet beyond the first send
        let snapshots = dispatcher.shutdown().await;

        assert_eq!(transport.sent_count(), 5);
        let total_sent: u64 = snapshots.iter().map(|(_, m)| m.sent_count).sum();
        assert_eq!(total_sent, 5);
    }
}
