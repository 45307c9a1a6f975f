//! Price History Analyzer
//!
//! Annualized growth and volatility from daily log returns.

use serde::Serialize;

use crate::error::AnalysisError;
use crate::model::PriceSeries;

/// Fixed annualization convention (crypto trades every day)
pub const TRADING_DAYS_PER_YEAR: f64 = 365.0;

/// Share of the historical return used for projections
pub const CONSERVATIVE_FACTOR: f64 = 0.5;

/// Annualized statistics derived from a price series.
///
/// Only produced by [`analyze`], so every instance comes from at least two
/// valid samples.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReturnStatistics {
    annual_return: f64,
    annual_volatility: f64,
    conservative_return: f64,
}

impl ReturnStatistics {
    /// Compound annual growth implied by the mean daily log return
    pub fn annual_return(&self) -> f64 {
        self.annual_return
    }

    /// Daily log-return standard deviation scaled by sqrt(365)
    pub fn annual_volatility(&self) -> f64 {
        self.annual_volatility
    }

    /// Half of the historical annual return
    pub fn conservative_return(&self) -> f64 {
        self.conservative_return
    }
}

/// Daily log returns `ln(p[i+1] / p[i])`
pub fn log_returns(series: &PriceSeries) -> Result<Vec<f64>, AnalysisError> {
    let prices = series.prices();
    if prices.len() < 2 {
        return Err(AnalysisError::InsufficientHistory {
            samples: prices.len(),
        });
    }

    if let Some((index, &price)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p <= 0.0)
    {
        return Err(AnalysisError::InvalidPrice { index, price });
    }

    Ok(prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

/// Compute annualized return, volatility and the conservative estimate
pub fn analyze(series: &PriceSeries) -> Result<ReturnStatistics, AnalysisError> {
    let returns = log_returns(series)?;

    let n = returns.len() as f64;
    let avg_daily_return = returns.iter().sum::<f64>() / n;
    // Population variance, divides by n
    let variance = returns
        .iter()
        .map(|r| (r - avg_daily_return).powi(2))
        .sum::<f64>()
        / n;
    let daily_volatility = variance.sqrt();

    let annual_return = (avg_daily_return * TRADING_DAYS_PER_YEAR).exp() - 1.0;
    let annual_volatility = daily_volatility * TRADING_DAYS_PER_YEAR.sqrt();

    tracing::debug!(
        samples = series.len(),
        avg_daily_return,
        daily_volatility,
        "Analyzed price history"
    );

    Ok(ReturnStatistics {
        annual_return,
        annual_volatility,
        conservative_return: annual_return * CONSERVATIVE_FACTOR,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_log_return_count() {
        let series = PriceSeries::new(vec![100.0, 102.0, 101.0, 105.0]);
        let returns = log_returns(&series).unwrap();
        assert_eq!(returns.len(), 3);
        assert!((returns[0] - (102.0_f64 / 100.0).ln()).abs() < EPS);
    }

    #[test]
    fn test_scenario_c_formulas() {
        let prices = [100.0, 102.0, 101.0, 105.0];
        let stats = analyze(&PriceSeries::new(prices.to_vec())).unwrap();

        let r = [
            (102.0_f64 / 100.0).ln(),
            (101.0_f64 / 102.0).ln(),
            (105.0_f64 / 101.0).ln(),
        ];
        let mean = r.iter().sum::<f64>() / 3.0;
        let std = (r.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 3.0).sqrt();

        assert!((stats.annual_return() - ((mean * 365.0).exp() - 1.0)).abs() < 1e-9);
        assert!((stats.annual_volatility() - std * 365.0_f64.sqrt()).abs() < EPS);
        assert!((stats.conservative_return() - stats.annual_return() / 2.0).abs() < EPS);
    }

    #[test]
    fn test_flat_series_has_zero_volatility() {
        let stats = analyze(&PriceSeries::new(vec![10.0; 30])).unwrap();
        assert!(stats.annual_return().abs() < EPS);
        assert!(stats.annual_volatility().abs() < EPS);
    }

    #[test]
    fn test_two_samples_is_enough() {
        let stats = analyze(&PriceSeries::new(vec![1.0, 2.0])).unwrap();
        assert_eq!(stats.annual_volatility(), 0.0);
        assert!(stats.annual_return() > 0.0);
    }

    #[test]
    fn test_insufficient_history() {
        for prices in [vec![], vec![42.0]] {
            let samples = prices.len();
            assert_eq!(
                analyze(&PriceSeries::new(prices)),
                Err(AnalysisError::InsufficientHistory { samples })
            );
        }
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let result = analyze(&PriceSeries::new(vec![1.0, 0.0, 2.0]));
        assert_eq!(
            result,
            Err(AnalysisError::InvalidPrice { index: 1, price: 0.0 })
        );
    }
}
