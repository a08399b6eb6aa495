//! # Transport
//!
//! Chat platform plumbing.
//!
//! - `TelegramClient`: Bot API send/edit plus long-poll update retrieval
//! - `UpdatePoller`: background task turning long polls into a message stream
//! - `MockTransport`: recording transport for tests
//!
//! The rest of the system only sees the `ChatTransport` trait and the
//! `InboundMessage` stream; nothing outside this crate speaks the wire
//! format.

mod mock;
mod poller;
mod telegram;

pub use contracts::{ChatTransport, InboundMessage};
pub use mock::{MockTransport, SentRecord};
pub use poller::UpdatePoller;
pub use telegram::TelegramClient;
