//! Domain Models
//!
//! Market data as the core sees it, independent of any provider's wire format.
//! The per-coin price and the investment amount use `rust_decimal`. Supply and
//! market cap stay `f64`: providers report them as doubles and they can exceed
//! `Decimal`'s range. Price series are `f64` because they only feed logarithms.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Point-in-time market statistics for one token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenSnapshot {
    /// Provider identifier (e.g., "bitcoin")
    pub id: String,

    /// Display name (e.g., "Bitcoin")
    pub name: String,

    /// Ticker symbol, upper-cased
    pub symbol: String,

    /// Current price in USD
    pub price_usd: Decimal,

    /// Market capitalization in USD, zero when the provider omits it
    pub market_cap_usd: f64,

    /// Coins currently in circulation, zero when absent
    pub circulating_supply: f64,

    /// Total supply, zero when absent (uncapped tokens)
    pub total_supply: f64,
}

impl TokenSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into().to_uppercase(),
            price_usd: Decimal::ZERO,
            market_cap_usd: 0.0,
            circulating_supply: 0.0,
            total_supply: 0.0,
        }
    }

    pub fn with_price(mut self, price_usd: Decimal) -> Self {
        self.price_usd = price_usd;
        self
    }

    pub fn with_market_cap(mut self, market_cap_usd: f64) -> Self {
        self.market_cap_usd = market_cap_usd;
        self
    }

    pub fn with_supply(mut self, circulating: f64, total: f64) -> Self {
        self.circulating_supply = circulating;
        self.total_supply = total;
        self
    }

    /// "Bitcoin (BTC)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.symbol.to_uppercase())
    }
}

/// Daily USD closes, oldest first
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn new(prices: Vec<f64>) -> Self {
        Self(prices)
    }

    pub fn prices(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for PriceSeries {
    fn from(prices: Vec<f64>) -> Self {
        Self(prices)
    }
}

/// One entry of the provider's coin catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinListing {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

impl CoinListing {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// A validated, strictly positive USD investment size
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct InvestmentAmount(Decimal);

impl InvestmentAmount {
    pub fn new(amount_usd: Decimal) -> Result<Self> {
        if amount_usd <= Decimal::ZERO {
            return Err(InputError::InvalidAmount(format!(
                "investment amount must be positive, got {amount_usd}"
            ))
            .into());
        }
        Ok(Self(amount_usd))
    }

    /// Parse user text such as `"1000"`, `" 250.50 "` or `"1e3"`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| InputError::InvalidAmount(format!("'{trimmed}' is not a number")))?;
        Self::new(amount)
    }

    pub fn usd(&self) -> Decimal {
        self.0
    }
}

/// Trimmed, lower-cased provider identifier
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_investment_amount_parsing() {
        assert_eq!(InvestmentAmount::parse("1000").unwrap().usd(), dec!(1000));
        assert_eq!(InvestmentAmount::parse(" 250.50 ").unwrap().usd(), dec!(250.50));
        assert_eq!(InvestmentAmount::parse("1e3").unwrap().usd(), dec!(1000));
    }

    #[test]
    fn test_investment_amount_rejects_non_positive() {
        assert!(matches!(
            InvestmentAmount::parse("-5"),
            Err(AdvisorError::InvalidInput(_))
        ));
        assert!(matches!(
            InvestmentAmount::parse("0"),
            Err(AdvisorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_investment_amount_rejects_garbage() {
        for input in ["", "abc", "inf", "NaN", "$100"] {
            assert!(
                matches!(InvestmentAmount::parse(input), Err(AdvisorError::InvalidInput(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_snapshot_display_name() {
        let snapshot = TokenSnapshot::new("solana", "Solana", "sol");
        assert_eq!(snapshot.symbol, "SOL");
        assert_eq!(snapshot.display_name(), "Solana (SOL)");
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("  Bitcoin \n"), "bitcoin");
    }
}
