//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

use crate::cli::RunArgs;
use crate::pipeline::{Relay, RelayOptions};

/// Execute the `run` command
pub async fn run_relay(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref token) = args.token {
        info!("Overriding bot token from CLI");
        config.telegram.token = token.clone();
    }
    if let Some(ref url) = args.data_url {
        info!(url = %url, "Overriding data URL from CLI");
        config.data.url = url.clone();
    }
    if let Some(interval) = args.interval {
        info!(interval_secs = interval, "Overriding update interval from CLI");
        config.schedule.interval_secs = interval;
    }

    info!(
        data_url = %config.data.url,
        targets = config.schedule.targets.len(),
        admins = config.telegram.admin_ids.len(),
        interval_secs = config.schedule.interval_secs,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    // Build relay options
    let options = RelayOptions {
        config,
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    let relay = Relay::new(options);

    info!("Starting relay...");

    let stats = relay
        .run(shutdown_signal())
        .await
        .context("Relay execution failed")?;

    info!(
        ticks = stats.scheduler.ticks,
        edits = stats.scheduler.edits_enqueued,
        replies = stats.responder.replies_enqueued,
        duration_secs = stats.duration.as_secs_f64(),
        "Relay completed"
    );

    stats.print_summary();

    info!("Price Relay finished");
    Ok(())
}

/// Resolves when Ctrl+C or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &contracts::RelayConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Transport:");
    println!("  API: {}", config.telegram.api_url);
    println!("  Admins: {}", config.telegram.admin_ids.len());
    println!("\nData source:");
    println!("  URL: {}", config.data.url);
    println!("\nMessage:");
    println!("  Command: {}", config.message.command_prefix);
    println!("  Template: {}", config.message.template);
    println!("\nSchedule (every {}s):", config.schedule.interval_secs);
    for target in &config.schedule.targets {
        println!(
            "  - chat {} message {}{}",
            target.chat_id,
            target.message_id,
            target
                .thread_id
                .map(|t| format!(" (thread {t})"))
                .unwrap_or_default()
        );
    }
    println!("\nDispatch:");
    println!(
        "  Min send interval: {}ms",
        config.dispatch.min_send_interval_ms
    );
    println!("  Queue capacity: {}", config.dispatch.queue_capacity);
    println!();
}
