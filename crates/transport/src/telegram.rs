//! Telegram Bot API client
//!
//! Thin JSON-over-HTTP wrapper: `sendMessage`, `editMessageText` and
//! `getUpdates`. API-level failures (`ok: false`) map to transport errors
//! carrying the API description.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use contracts::{ChatTransport, Destination, InboundMessage, MessageRef, RelayError};

/// Request timeout for send/edit calls
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Bot API client
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    /// Create a client for the given API base and bot token
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        }
    }

    /// Long-poll for inbound updates
    ///
    /// Returns raw inbound messages plus the next offset to ack with.
    /// Updates without message text are consumed but not surfaced.
    pub async fn get_updates(
        &self,
        offset: i64,
        poll_timeout_secs: u64,
    ) -> Result<(Vec<InboundMessage>, i64), RelayError> {
        let body = json!({
            "offset": offset,
            "timeout": poll_timeout_secs,
            "allowed_updates": ["message"],
        });

        let updates: Vec<WireUpdate> = self
            .call_with_timeout(
                "getUpdates",
                &body,
                Duration::from_secs(poll_timeout_secs) + CALL_TIMEOUT,
            )
            .await?;

        let mut next_offset = offset;
        let mut messages = Vec::new();
        for update in updates {
            next_offset = next_offset.max(update.update_id + 1);
            if let Some(message) = update.message.and_then(WireMessage::into_inbound) {
                messages.push(message);
            }
        }

        Ok((messages, next_offset))
    }

    /// POST one API method and unwrap the response envelope
    async fn call_with_timeout<R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<R, RelayError> {
        let url = format!("{}/{method}", self.base);
        debug!(method, "Calling Bot API");

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::Other(format!("bot api {method}: {e}")))?;

        let envelope: ApiResponse<R> = response
            .json()
            .await
            .map_err(|e| RelayError::Other(format!("bot api {method} decode: {e}")))?;

        envelope.into_result(method)
    }

    async fn call<R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<R, RelayError> {
        self.call_with_timeout(method, body, CALL_TIMEOUT).await
    }
}

impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        destination: Destination,
        text: &str,
    ) -> Result<MessageRef, RelayError> {
        let mut body = json!({
            "chat_id": destination.chat_id,
            "text": text,
        });
        if let Some(thread_id) = destination.thread_id {
            body["message_thread_id"] = json!(thread_id);
        }

        let message: WireMessage = self
            .call("sendMessage", &body)
            .await
            .map_err(|e| RelayError::transport(destination, e.to_string()))?;

        Ok(MessageRef {
            chat_id: message.chat.id,
            message_id: message.message_id,
        })
    }

    async fn edit_message(
        &self,
        destination: Destination,
        message_id: i64,
        text: &str,
    ) -> Result<(), RelayError> {
        let body = json!({
            "chat_id": destination.chat_id,
            "message_id": message_id,
            "text": text,
        });

        // Result payload is the edited message; only the envelope matters here
        let _: serde_json::Value = self
            .call("editMessageText", &body)
            .await
            .map_err(|e| RelayError::transport(destination, e.to_string()))?;

        Ok(())
    }
}

/// Bot API response envelope
///
/// `Option` fields absorb the absent `result`/`description` keys without a
/// `serde(default)`, which would otherwise demand `R: Default`.
#[derive(Debug, Deserialize)]
struct ApiResponse<R> {
    ok: bool,
    result: Option<R>,
    description: Option<String>,
}

impl<R> ApiResponse<R> {
    fn into_result(self, method: &str) -> Result<R, RelayError> {
        if !self.ok {
            let description = self
                .description
                .unwrap_or_else(|| "no description".to_string());
            return Err(RelayError::Other(format!("bot api {method}: {description}")));
        }
        self.result
            .ok_or_else(|| RelayError::Other(format!("bot api {method}: empty result")))
    }
}

#[derive(Debug, Deserialize)]
struct WireUpdate {
    update_id: i64,
    #[serde(default)]
    message: Option<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    message_id: i64,
    chat: WireChat,
    #[serde(default)]
    message_thread_id: Option<i64>,
    #[serde(default)]
    from: Option<WireUser>,
    #[serde(default)]
    text: Option<String>,
}

impl WireMessage {
    /// Surface a wire message as an inbound command candidate.
    ///
    /// Messages without a sender or text (service messages, media) yield
    /// `None`.
    fn into_inbound(self) -> Option<InboundMessage> {
        let from = self.from?;
        let text = self.text?;
        Some(InboundMessage {
            destination: Destination {
                chat_id: self.chat.id,
                thread_id: self.message_thread_id,
            },
            from_id: from.id,
            message_id: self.message_id,
            text,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: i64,
}
