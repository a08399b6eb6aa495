//! # Dispatcher
//!
//! Per-destination outbound message dispatch.
//!
//! Responsibilities:
//! - One FIFO queue and one worker task per destination, created lazily
//! - At most one send/edit in flight per destination
//! - Minimum spacing between consecutive sends to one destination
//! - Isolate failing/slow destinations from each other

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;

pub use contracts::{ChatTransport, DeferredRequest, Destination};
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use handle::DestinationHandle;
pub use metrics::{DestinationMetrics, MetricsSnapshot};
