//! # Relay
//!
//! The glue between market data and chat destinations.
//!
//! - `UpdateScheduler`: fixed-interval ticks that fetch a snapshot, render
//!   the template and enqueue replace-in-place edits for every configured
//!   target
//! - `CommandResponder`: on-demand replies to authorized command messages
//!
//! Both push all outbound traffic through the per-destination dispatch
//! queue, so scheduled edits and ad-hoc sends share one rate-limit clock.

mod responder;
mod scheduler;

pub use responder::{CommandResponder, ResponderStats};
pub use scheduler::{UpdateScheduler, SchedulerStats};
