//! Token Health Evaluator
//!
//! Supply distribution and dilution checks behind the "Should I Invest?" row.
//! Supplies can exceed `Decimal`'s range, so the arithmetic runs in `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::TokenSnapshot;

/// Minimum share of total supply that must already circulate
pub const MIN_CIRCULATING_PERCENT: f64 = 50.0;

/// FDV may be at most this multiple of market cap
pub const MAX_FDV_TO_MCAP: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Healthy,
    Risky,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Healthy => "✅ This coin seems healthy!",
            Verdict::Risky => "⚠️ Warning: This coin might be risky or inflated.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealthAssessment {
    pub verdict: Verdict,

    /// Total supply × price, zero when total supply is unknown
    pub fully_diluted_valuation: f64,

    /// `None` when total supply is zero
    pub circulating_percent: Option<f64>,

    /// `None` when market cap is zero
    pub fdv_to_mcap_ratio: Option<f64>,
}

impl HealthAssessment {
    pub fn is_healthy(&self) -> bool {
        self.verdict == Verdict::Healthy
    }
}

/// Evaluate supply and valuation figures.
///
/// Healthy requires both ratios to be defined, more than half the supply
/// circulating and FDV below twice the market cap.
pub fn evaluate(
    circulating_supply: f64,
    total_supply: f64,
    price_usd: Decimal,
    market_cap_usd: f64,
) -> HealthAssessment {
    let price = price_usd.to_f64().unwrap_or(f64::NAN);
    let fully_diluted_valuation = if total_supply > 0.0 {
        total_supply * price
    } else {
        0.0
    };

    let circulating_percent =
        (total_supply > 0.0).then(|| circulating_supply / total_supply * 100.0);
    let fdv_to_mcap_ratio =
        (market_cap_usd > 0.0).then(|| fully_diluted_valuation / market_cap_usd);

    let healthy = matches!(circulating_percent, Some(p) if p > MIN_CIRCULATING_PERCENT)
        && matches!(fdv_to_mcap_ratio, Some(r) if r < MAX_FDV_TO_MCAP);

    HealthAssessment {
        verdict: if healthy { Verdict::Healthy } else { Verdict::Risky },
        fully_diluted_valuation,
        circulating_percent,
        fdv_to_mcap_ratio,
    }
}

/// Evaluate the figures carried by a snapshot
pub fn evaluate_snapshot(snapshot: &TokenSnapshot) -> HealthAssessment {
    evaluate(
        snapshot.circulating_supply,
        snapshot.total_supply,
        snapshot.price_usd,
        snapshot.market_cap_usd,
    )
}
