//! # Market Data
//!
//! Snapshot retrieval from the upstream market-data endpoint.
//!
//! One HTTP GET, one JSON body, one immutable `MarketSnapshot`. Any non-2xx
//! status or decode failure is a fetch-layer error; the caller decides
//! whether that means skipping a tick or dropping a reply.

mod client;

pub use client::MarketClient;
pub use contracts::{MarketSnapshot, MarketSource};
