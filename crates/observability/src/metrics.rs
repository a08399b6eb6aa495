//! Relay metrics
//!
//! All metric names carry the `price_relay_` prefix. Recording is a no-op
//! until a metrics recorder has been installed, so callers never need to
//! guard these.

use metrics::{counter, gauge};

/// Record one completed scheduler tick
pub fn record_tick() {
    counter!("price_relay_ticks_total").increment(1);
}

/// Record a failed snapshot fetch (scheduler tick or command reply)
pub fn record_fetch_failure() {
    counter!("price_relay_fetch_failures_total").increment(1);
}

/// Record the depth of a destination queue
pub fn record_queue_depth(destination: &str, depth: usize) {
    gauge!(
        "price_relay_queue_depth",
        "destination" => destination.to_string()
    )
    .set(depth as f64);
}

/// Record cumulative delivery totals for a destination
///
/// The dispatcher owns the counters; this mirrors its snapshot into
/// Prometheus gauges on each flush.
pub fn record_destination_totals(destination: &str, sent: u64, failures: u64, dropped: u64) {
    gauge!(
        "price_relay_sent_total",
        "destination" => destination.to_string()
    )
    .set(sent as f64);
    gauge!(
        "price_relay_send_failures_total",
        "destination" => destination.to_string()
    )
    .set(failures as f64);
    gauge!(
        "price_relay_dropped_total",
        "destination" => destination.to_string()
    )
    .set(dropped as f64);
}
