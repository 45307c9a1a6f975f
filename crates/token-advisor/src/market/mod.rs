//! Market Data Integration
//!
//! Abstraction over the public market data provider, plus a CoinGecko
//! implementation and an in-memory mock.

mod coingecko;
mod mock;
mod provider;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig};
pub use mock::MockMarketData;
pub use provider::{MarketConfig, ProviderKind};

use async_trait::async_trait;

use crate::error::MarketDataError;
use crate::model::{CoinListing, PriceSeries, TokenSnapshot};

/// Days of daily history requested for return statistics
pub const HISTORY_DAYS: u32 = 365;

pub type MarketResult<T> = std::result::Result<T, MarketDataError>;

/// Market data client trait (Strategy pattern)
///
/// Implementations report both "no such coin" and transport or decoding
/// failures through [`MarketDataError`]. Retries and timeouts are the
/// implementation's business; callers make exactly one call per lookup.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Current USD market statistics for a coin
    async fn fetch_snapshot(&self, id: &str) -> MarketResult<TokenSnapshot>;

    /// Daily USD prices for the last `days` days, oldest first
    async fn fetch_price_history(&self, id: &str, days: u32) -> MarketResult<PriceSeries>;

    /// Every coin the provider knows about
    async fn fetch_all_identifiers(&self) -> MarketResult<Vec<CoinListing>>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> bool;

    /// Provider name
    fn name(&self) -> &str;
}
