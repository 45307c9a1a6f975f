//! Report Assembler
//!
//! Runs the lookup → analysis → evaluation pipeline for one coin and turns
//! the result into labelled rows, or into suggestions when the coin cannot
//! be resolved.
//!
//! ```text
//! ResolveSnapshot ──▶ ResolveHistory ──▶ Compute ──▶ Evaluate ──▶ Report
//!        │                  │               │
//!        └──────────────────┴───────────────┴──▶ Suggest ──▶ NotFound
//! ```

pub mod format;

use std::sync::Arc;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::analysis::{analyze, evaluate_snapshot, HealthAssessment, ReturnStatistics};
use crate::error::{AdvisorError, InputError, Result};
use crate::market::{MarketDataClient, HISTORY_DAYS};
use crate::model::{normalize_id, InvestmentAmount, TokenSnapshot};
use crate::resolver::{suggest, SuggestionList};

/// Number of rows in every successful report
pub const REPORT_ROWS: usize = 14;

/// One labelled line of the report
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub label: &'static str,
    pub value: String,
    /// Plain-language explanation for non-experts
    pub note: &'static str,
}

impl ReportRow {
    fn new(label: &'static str, value: String, note: &'static str) -> Self {
        Self { label, value, note }
    }

    /// `value - note`, as shown in a two-column table
    pub fn display_value(&self) -> String {
        format!("{} - {}", self.value, self.note)
    }
}

/// Dollar returns expected from an investment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReturnProjection {
    /// `None` when the conservative return is not a finite number
    pub yearly: Option<Decimal>,
    pub monthly: Option<Decimal>,
}

/// Scale the conservative annual return by the investment size
pub fn project_returns(amount: InvestmentAmount, statistics: &ReturnStatistics) -> ReturnProjection {
    let yearly = Decimal::from_f64(statistics.conservative_return())
        .and_then(|rate| amount.usd().checked_mul(rate));
    let monthly = yearly.map(|y| y / dec!(12));
    ReturnProjection { yearly, monthly }
}

/// Finished report for one coin
#[derive(Clone, Debug, Serialize)]
pub struct TokenReport {
    pub coin_id: String,
    rows: Vec<ReportRow>,
}

impl TokenReport {
    pub fn build(
        snapshot: &TokenSnapshot,
        statistics: &ReturnStatistics,
        health: &HealthAssessment,
        amount: InvestmentAmount,
    ) -> Self {
        let projection = project_returns(amount, statistics);

        let rows = vec![
            ReportRow::new(
                "Coin Name & Symbol",
                snapshot.display_name(),
                "The coin you looked up",
            ),
            ReportRow::new(
                "Current Price ($)",
                format::usd(snapshot.price_usd, 6),
                "What one coin costs right now",
            ),
            ReportRow::new(
                "Market Cap (B)",
                format::usd_billions(snapshot.market_cap_usd),
                "The value of all coins in the market",
            ),
            ReportRow::new(
                "Total Supply (M)",
                format::millions(snapshot.total_supply),
                "Maximum possible number of coins",
            ),
            ReportRow::new(
                "Circulating Supply (M)",
                format::millions(snapshot.circulating_supply),
                "Coins that are currently in circulation",
            ),
            ReportRow::new(
                "Circulating Supply %",
                format::percent(health.circulating_percent),
                "Share of all coins already unlocked; higher is better",
            ),
            ReportRow::new(
                "FDV (B)",
                format::usd_billions(health.fully_diluted_valuation),
                "What the coin could be worth if all coins were unlocked",
            ),
            ReportRow::new(
                "FDV/Market Cap Ratio",
                format::ratio(health.fdv_to_mcap_ratio),
                "The lower this ratio, the better",
            ),
            ReportRow::new(
                "Historical Annual Return (CAGR)",
                format::rate(statistics.annual_return()),
                "This is how much the coin has grown over the past year",
            ),
            ReportRow::new(
                "Annual Volatility",
                format::rate(statistics.annual_volatility()),
                "How much the coin's price fluctuates",
            ),
            ReportRow::new(
                "Realistic Yearly Return (50% of CAGR)",
                format::rate(statistics.conservative_return()),
                "A safer, more realistic return",
            ),
            ReportRow::new(
                "Expected Monthly Return ($)",
                format::usd_opt(projection.monthly, 2),
                "How much you could make per month",
            ),
            ReportRow::new(
                "Expected Yearly Return ($)",
                format::usd_opt(projection.yearly, 2),
                "How much you could make per year",
            ),
            ReportRow::new(
                "Should I Invest?",
                health.verdict.message().to_string(),
                "Healthy means over 50% circulating and FDV under 2x market cap",
            ),
        ];

        Self {
            coin_id: snapshot.id.clone(),
            rows,
        }
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Look up a row value by label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    /// `(label, value - note)` pairs in display order
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        self.rows
            .iter()
            .map(|row| (row.label, row.display_value()))
            .collect()
    }
}

/// Terminal state of the pipeline
#[derive(Debug)]
pub enum ReportOutcome {
    Report(TokenReport),

    /// The coin could not be resolved. `cause` says why; `suggestions` may
    /// be empty.
    NotFound {
        requested: String,
        cause: AdvisorError,
        suggestions: SuggestionList,
    },
}

impl ReportOutcome {
    pub fn report(&self) -> Option<&TokenReport> {
        match self {
            ReportOutcome::Report(report) => Some(report),
            ReportOutcome::NotFound { .. } => None,
        }
    }

    pub fn suggestions(&self) -> Option<&SuggestionList> {
        match self {
            ReportOutcome::Report(_) => None,
            ReportOutcome::NotFound { suggestions, .. } => Some(suggestions),
        }
    }
}

/// Drives one report per call; holds nothing between calls except the
/// client handle.
#[derive(Clone)]
pub struct ReportAssembler {
    market: Arc<dyn MarketDataClient>,
}

impl ReportAssembler {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self { market }
    }

    pub fn market(&self) -> &Arc<dyn MarketDataClient> {
        &self.market
    }

    /// Validate raw user input, then assemble.
    ///
    /// Only input problems come back as `Err`; lookup and analysis failures
    /// are folded into [`ReportOutcome::NotFound`].
    pub async fn run(&self, identifier: &str, amount: &str) -> Result<ReportOutcome> {
        if identifier.trim().is_empty() {
            return Err(InputError::EmptyIdentifier.into());
        }
        let amount = InvestmentAmount::parse(amount)?;
        Ok(self.assemble(identifier, amount).await)
    }

    /// Build a report, falling back to suggestions on any resolution failure
    pub async fn assemble(&self, identifier: &str, amount: InvestmentAmount) -> ReportOutcome {
        let id = normalize_id(identifier);

        match self.resolve(&id, amount).await {
            Ok(report) => {
                tracing::info!(coin = %id, "Assembled token report");
                ReportOutcome::Report(report)
            }
            Err(cause) => {
                tracing::warn!(
                    coin = %id,
                    error = %cause,
                    "Could not resolve coin, suggesting alternatives"
                );
                let suggestions = self.suggest(&id).await;
                ReportOutcome::NotFound {
                    requested: id,
                    cause,
                    suggestions,
                }
            }
        }
    }

    async fn resolve(&self, id: &str, amount: InvestmentAmount) -> Result<TokenReport> {
        let snapshot = self.market.fetch_snapshot(id).await?;
        let history = self.market.fetch_price_history(id, HISTORY_DAYS).await?;
        let statistics = analyze(&history)?;
        let health = evaluate_snapshot(&snapshot);

        Ok(TokenReport::build(&snapshot, &statistics, &health, amount))
    }

    /// Similar identifiers from the full catalog; empty if it is unavailable
    pub async fn suggest(&self, identifier: &str) -> SuggestionList {
        match self.market.fetch_all_identifiers().await {
            Ok(catalog) => suggest(identifier, &catalog),
            Err(e) => {
                tracing::warn!(error = %e, "Coin catalog unavailable, no suggestions");
                SuggestionList::empty()
            }
        }
    }
}
