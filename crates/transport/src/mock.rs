//! Recording mock transport
//!
//! Used by relay unit tests and the e2e suite. Records every accepted
//! send/edit with its delivery instant, and can be flipped into a failing
//! mode to exercise error paths.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use tokio::time::Instant;

use contracts::{ChatTransport, Destination, MessageRef, RelayError};

/// One recorded outbound call
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub destination: Destination,
    /// Wire method name (`sendMessage` / `editMessageText`)
    pub method: &'static str,
    /// Edited message id, or the id assigned to a new message
    pub message_id: i64,
    pub text: String,
    pub at: Instant,
}

/// Transport double that records instead of talking to a chat platform
#[derive(Debug, Default)]
pub struct MockTransport {
    records: Mutex<Vec<SentRecord>>,
    next_message_id: AtomicI64,
    failing: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of everything delivered so far
    pub fn sent(&self) -> Vec<SentRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of delivered calls
    pub fn sent_count(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn record(&self, record: SentRecord) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
    }
}

impl ChatTransport for MockTransport {
    async fn send_message(
        &self,
        destination: Destination,
        text: &str,
    ) -> Result<MessageRef, RelayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RelayError::transport(destination, "mock send failure"));
        }
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(SentRecord {
            destination,
            method: "sendMessage",
            message_id,
            text: text.to_string(),
            at: Instant::now(),
        });
        Ok(MessageRef {
            chat_id: destination.chat_id,
            message_id,
        })
    }

    async fn edit_message(
        &self,
        destination: Destination,
        message_id: i64,
        text: &str,
    ) -> Result<(), RelayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RelayError::transport(destination, "mock edit failure"));
        }
        self.record(SentRecord {
            destination,
            method: "editMessageText",
            message_id,
            text: text.to_string(),
            at: Instant::now(),
        });
        Ok(())
    }
}
