//! Provider Selection
//!
//! `MARKET_DATA_PROVIDER` decides which [`MarketDataClient`] backs the
//! pipeline. Every front end builds its client through [`MarketConfig`].

use std::sync::Arc;

use super::{CoinGeckoClient, CoinGeckoConfig, MarketDataClient, MockMarketData};
use crate::error::Result;

/// Which market data backend to serve from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    CoinGecko,
    /// Built-in demo data, no network
    Mock,
}

impl ProviderKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "coingecko" => Some(Self::CoinGecko),
            "mock" | "demo" => Some(Self::Mock),
            _ => None,
        }
    }
}

/// Provider choice plus the settings of the real provider
#[derive(Clone, Debug, Default)]
pub struct MarketConfig {
    /// `MARKET_DATA_PROVIDER`: `coingecko` (default), `mock` or `demo`
    pub provider: ProviderKind,

    pub coingecko: CoinGeckoConfig,
}

impl MarketConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unknown provider names fall back to CoinGecko with a warning
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let provider = match lookup("MARKET_DATA_PROVIDER") {
            Some(raw) => ProviderKind::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown MARKET_DATA_PROVIDER, using coingecko");
                ProviderKind::CoinGecko
            }),
            None => ProviderKind::CoinGecko,
        };

        Self {
            provider,
            coingecko: CoinGeckoConfig::from_lookup(&lookup),
        }
    }

    /// Construct the configured market data client
    pub fn client(&self) -> Result<Arc<dyn MarketDataClient>> {
        let client: Arc<dyn MarketDataClient> = match self.provider {
            ProviderKind::CoinGecko => Arc::new(CoinGeckoClient::new(self.coingecko.clone())?),
            ProviderKind::Mock => Arc::new(MockMarketData::demo()),
        };
        Ok(client)
    }
}
