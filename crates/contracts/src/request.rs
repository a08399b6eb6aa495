//! Outbound and inbound message types shared between dispatcher, scheduler
//! and responder.

use tokio::sync::oneshot;

use crate::{Destination, RelayError};

/// Reference to a message accepted by the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

/// What the transport should do with the payload text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundMethod {
    /// Create a new message in the destination
    SendMessage,
    /// Replace the text of a previously-sent message
    EditMessage { message_id: i64 },
}

impl OutboundMethod {
    /// Wire-level method name (used for logging/metrics labels)
    pub fn name(&self) -> &'static str {
        match self {
            Self::SendMessage => "sendMessage",
            Self::EditMessage { .. } => "editMessageText",
        }
    }
}

/// Outcome of a single deferred request, delivered through its completion
/// channel. Edits resolve to the edited message's reference.
pub type SendOutcome = Result<MessageRef, RelayError>;

/// A queued outbound request.
///
/// Created at enqueue time, consumed by the destination worker, discarded
/// once the outcome has been reported.
#[derive(Debug)]
pub struct DeferredRequest {
    pub method: OutboundMethod,
    pub destination: Destination,
    pub text: String,
    /// Completion channel; `None` for fire-and-forget producers
    pub done: Option<oneshot::Sender<SendOutcome>>,
}

impl DeferredRequest {
    /// Fire-and-forget send
    pub fn send(destination: Destination, text: impl Into<String>) -> Self {
        Self {
            method: OutboundMethod::SendMessage,
            destination,
            text: text.into(),
            done: None,
        }
    }

    /// Fire-and-forget edit
    pub fn edit(destination: Destination, message_id: i64, text: impl Into<String>) -> Self {
        Self {
            method: OutboundMethod::EditMessage { message_id },
            destination,
            text: text.into(),
            done: None,
        }
    }

    /// Attach a completion channel
    pub fn with_done(mut self, done: oneshot::Sender<SendOutcome>) -> Self {
        self.done = Some(done);
        self
    }

    /// Report the outcome to the producer, if one is listening
    pub fn complete(self, outcome: SendOutcome) {
        if let Some(done) = self.done {
            // Producer may have given up waiting; that is not an error
            let _ = done.send(outcome);
        }
    }
}

/// An inbound message observed by the transport poller
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Where the message was posted (and where a reply would go)
    pub destination: Destination,
    /// Platform identity of the sender
    pub from_id: i64,
    /// Platform id of the inbound message itself
    pub message_id: i64,
    /// Raw message text
    pub text: String,
}
