//! ChatTransport trait - outbound message interface
//!
//! Defines the abstract interface for the chat platform client. The core
//! treats it as an opaque, possibly-failing, possibly-slow dependency.

use crate::{Destination, MessageRef, RelayError};

/// Chat platform send/edit interface
///
/// Implementations must be shareable across destination workers, hence
/// `&self` methods and the `Sync` bound.
#[trait_variant::make(ChatTransport: Send)]
pub trait LocalChatTransport: Sync {
    /// Create a new message in the destination
    ///
    /// # Errors
    /// Returns a transport error; the dispatcher reports it to the producer
    /// and moves on, it never retries.
    async fn send_message(
        &self,
        destination: Destination,
        text: &str,
    ) -> Result<MessageRef, RelayError>;

    /// Replace the text of a previously-sent message
    async fn edit_message(
        &self,
        destination: Destination,
        message_id: i64,
        text: &str,
    ) -> Result<(), RelayError>;
}
