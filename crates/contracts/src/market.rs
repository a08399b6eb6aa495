//! MarketSource trait - snapshot fetch interface

use crate::{MarketSnapshot, RelayError};

/// Market data fetch interface
///
/// One call produces one immutable snapshot. Failures are per-call; the
/// caller decides whether to skip a tick or drop a reply.
#[trait_variant::make(MarketSource: Send)]
pub trait LocalMarketSource: Sync {
    /// Fetch a fresh snapshot
    ///
    /// # Errors
    /// `RelayError::Fetch` for network / non-2xx failures,
    /// `RelayError::Decode` for undecodable bodies.
    async fn fetch(&self) -> Result<MarketSnapshot, RelayError>;
}
