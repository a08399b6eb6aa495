//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Rate limiting uses the monotonic tokio clock, stamped per destination
//! - Wall-clock time appears only in rendered message text

mod config;
mod destination;
mod error;
mod market;
mod request;
mod snapshot;
mod transport;

pub use config::*;
pub use destination::Destination;
pub use error::*;
pub use market::MarketSource;
pub use request::*;
pub use snapshot::MarketSnapshot;
pub use transport::ChatTransport;
