//! Mock Market Data Client
//!
//! For testing and demo purposes. Serves fixed snapshots and synthetic
//! price histories from memory.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal_macros::dec;

use super::{MarketDataClient, MarketResult};
use crate::error::MarketDataError;
use crate::model::{CoinListing, PriceSeries, TokenSnapshot};

/// In-memory market data
#[derive(Clone, Debug, Default)]
pub struct MockMarketData {
    snapshots: HashMap<String, TokenSnapshot>,
    histories: HashMap<String, PriceSeries>,
    catalog: Vec<CoinListing>,
    /// Simulate a provider outage on every call
    offline: bool,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handful of coins with deterministic year-long histories
    pub fn demo() -> Self {
        Self::new()
            .with_coin(
                TokenSnapshot::new("bitcoin", "Bitcoin", "btc")
                    .with_price(dec!(65000))
                    .with_market_cap(1_280_000_000_000.0)
                    .with_supply(19_700_000.0, 21_000_000.0),
                synthetic_history(42000.0, 0.0012, 0.025),
            )
            .with_coin(
                TokenSnapshot::new("ethereum", "Ethereum", "eth")
                    .with_price(dec!(3450))
                    .with_market_cap(415_000_000_000.0)
                    .with_supply(120_300_000.0, 120_300_000.0),
                synthetic_history(2200.0, 0.0009, 0.03),
            )
            .with_coin(
                TokenSnapshot::new("solana", "Solana", "sol")
                    .with_price(dec!(195))
                    .with_market_cap(92_000_000_000.0)
                    .with_supply(470_000_000.0, 590_000_000.0),
                synthetic_history(60.0, 0.003, 0.045),
            )
            .with_coin(
                TokenSnapshot::new("worldcoin-wld", "Worldcoin", "wld")
                    .with_price(dec!(2.10))
                    .with_market_cap(1_100_000_000.0)
                    .with_supply(520_000_000.0, 10_000_000_000.0),
                synthetic_history(4.5, -0.002, 0.06),
            )
            .with_listing(CoinListing::new("bitcoin-cash", "bch", "Bitcoin Cash"))
            .with_listing(CoinListing::new("ethereum-classic", "etc", "Ethereum Classic"))
    }

    /// Register a coin with its snapshot and history; also lists it
    pub fn with_coin(mut self, snapshot: TokenSnapshot, history: PriceSeries) -> Self {
        self.catalog.push(CoinListing::new(
            snapshot.id.clone(),
            snapshot.symbol.to_lowercase(),
            snapshot.name.clone(),
        ));
        self.histories.insert(snapshot.id.clone(), history);
        self.snapshots.insert(snapshot.id.clone(), snapshot);
        self
    }

    /// Register a snapshot whose history lookup will fail
    pub fn with_snapshot_only(mut self, snapshot: TokenSnapshot) -> Self {
        self.catalog.push(CoinListing::new(
            snapshot.id.clone(),
            snapshot.symbol.to_lowercase(),
            snapshot.name.clone(),
        ));
        self.snapshots.insert(snapshot.id.clone(), snapshot);
        self
    }

    /// Add a catalog entry without market data
    pub fn with_listing(mut self, listing: CoinListing) -> Self {
        self.catalog.push(listing);
        self
    }

    /// Fail every call with `Unavailable`
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn check_online(&self) -> MarketResult<()> {
        if self.offline {
            return Err(MarketDataError::Unavailable("mock provider offline".into()));
        }
        Ok(())
    }
}

/// Geometric walk with a fixed drift and an alternating shock
fn synthetic_history(start: f64, daily_drift: f64, swing: f64) -> PriceSeries {
    let mut price = start;
    let prices = (0..365)
        .map(|day| {
            let shock = if day % 2 == 0 { swing } else { -swing };
            let current = price;
            price *= (daily_drift + shock).exp();
            current
        })
        .collect::<Vec<_>>();
    PriceSeries::new(prices)
}

#[async_trait]
impl MarketDataClient for MockMarketData {
    async fn fetch_snapshot(&self, id: &str) -> MarketResult<TokenSnapshot> {
        self.check_online()?;
        self.snapshots
            .get(id)
            .cloned()
            .ok_or_else(|| MarketDataError::NotFound(id.to_string()))
    }

    async fn fetch_price_history(&self, id: &str, days: u32) -> MarketResult<PriceSeries> {
        self.check_online()?;
        let series = self
            .histories
            .get(id)
            .ok_or_else(|| MarketDataError::NotFound(id.to_string()))?;

        // Keep the most recent `days` samples
        let prices = series.prices();
        let keep = prices.len().min(days as usize);
        Ok(PriceSeries::new(prices[prices.len() - keep..].to_vec()))
    }

    async fn fetch_all_identifiers(&self) -> MarketResult<Vec<CoinListing>> {
        self.check_online()?;
        Ok(self.catalog.clone())
    }

    async fn health_check(&self) -> bool {
        !self.offline
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}
