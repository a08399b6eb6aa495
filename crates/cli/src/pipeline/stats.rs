//! Relay run statistics.

use std::time::Duration;

use contracts::Destination;
use dispatcher::MetricsSnapshot;
use relay::{ResponderStats, SchedulerStats};

/// Statistics from a relay run
#[derive(Debug, Clone, Default)]
pub struct RelayStats {
    /// Total duration of the run
    pub duration: Duration,

    /// Scheduler counters
    pub scheduler: SchedulerStats,

    /// Responder counters
    pub responder: ResponderStats,

    /// Final per-destination dispatch metrics
    pub destinations: Vec<(Destination, MetricsSnapshot)>,
}

impl RelayStats {
    /// Total deliveries across all destinations
    pub fn total_sent(&self) -> u64 {
        self.destinations.iter().map(|(_, m)| m.sent_count).sum()
    }

    /// Total transport failures across all destinations
    pub fn total_failures(&self) -> u64 {
        self.destinations.iter().map(|(_, m)| m.failure_count).sum()
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Relay Statistics ===\n");

        println!("Overview");
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        println!("  Messages delivered: {}", self.total_sent());
        println!("  Transport failures: {}", self.total_failures());

        println!("\nScheduler");
        println!("  Ticks: {}", self.scheduler.ticks);
        println!("  Fetch failures: {}", self.scheduler.fetch_failures);
        println!("  Edits enqueued: {}", self.scheduler.edits_enqueued);

        println!("\nResponder");
        println!("  Commands handled: {}", self.responder.commands);
        println!("  Unauthorized dropped: {}", self.responder.unauthorized);
        println!("  Replies enqueued: {}", self.responder.replies_enqueued);

        if !self.destinations.is_empty() {
            println!("\nDestinations");
            for (destination, metrics) in &self.destinations {
                println!(
                    "  {}: sent={} failed={} dropped={}",
                    destination, metrics.sent_count, metrics.failure_count, metrics.dropped_count
                );
            }
        }

        println!();
    }
}
