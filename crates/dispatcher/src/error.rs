//! Dispatcher error types

use contracts::Destination;
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Queue full - request refused
    #[error("dispatch queue full for destination '{destination}'")]
    QueueFull { destination: Destination },

    /// Worker task is gone - request refused
    #[error("destination worker closed for '{destination}'")]
    WorkerClosed { destination: Destination },
}
