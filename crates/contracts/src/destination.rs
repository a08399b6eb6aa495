//! Destination - Addressable chat endpoint
//!
//! Composite key for one chat/thread. Every outbound request targets exactly
//! one `Destination`, and the dispatcher keeps one queue and one rate-limit
//! clock per key. The message id of a scheduled edit is not part of the key,
//! so edits and sends to the same chat share a clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat/thread endpoint identifier.
///
/// Cheap to copy and usable as a `HashMap` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination {
    /// Platform chat identifier
    pub chat_id: i64,

    /// Forum thread within the chat, if any
    #[serde(default)]
    pub thread_id: Option<i64>,
}

impl Destination {
    /// Create a destination for a plain chat
    pub fn chat(chat_id: i64) -> Self {
        Self {
            chat_id,
            thread_id: None,
        }
    }

    /// Create a destination for a thread inside a chat
    pub fn thread(chat_id: i64, thread_id: i64) -> Self {
        Self {
            chat_id,
            thread_id: Some(thread_id),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.thread_id {
            Some(thread) => write!(f, "{}_{}", self.chat_id, thread),
            None => write!(f, "{}", self.chat_id),
        }
    }
}
