//! # token-advisor
//!
//! Single-token health check and return forecast from public market data.
//!
//! ## Pipeline
//!
//! ```text
//! (coin id, USD amount)
//!        │
//!        ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   Snapshot   │──▶│ 365d history │──▶│   Returns &  │──▶│    Health    │──▶ TokenReport
//! │   lookup     │   │    lookup    │   │  volatility  │   │   verdict    │    (14 rows)
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘   └──────────────┘
//!        └──────────────────┴──────────────────┴──▶ fuzzy match catalog ──▶ suggestions
//! ```
//!
//! ## Health Rule
//!
//! A coin is **healthy** only when both hold:
//!
//! - more than 50% of total supply is already circulating
//! - fully diluted valuation is less than 2x market cap
//!
//! Either figure being undefined (no total supply, no market cap) makes it
//! **risky**.
//!
//! ## Projection
//!
//! Expected returns use half of last year's annualized log-return growth,
//! scaled by the investment amount. This is a rough guide, not a forecast.

pub mod analysis;
pub mod error;
pub mod market;
pub mod model;
pub mod report;
pub mod resolver;

pub use analysis::{HealthAssessment, ReturnStatistics, Verdict};
pub use error::{AdvisorError, AnalysisError, InputError, MarketDataError, Result};
pub use market::{
    CoinGeckoClient, CoinGeckoConfig, MarketConfig, MarketDataClient, MockMarketData, ProviderKind,
};
pub use model::{CoinListing, InvestmentAmount, PriceSeries, TokenSnapshot};
pub use report::{ReportAssembler, ReportOutcome, ReportRow, TokenReport};
pub use resolver::{Suggestion, SuggestionList};
