//! Market Analysis
//!
//! Pure computations over fetched market data.

pub mod health;
pub mod returns;

pub use health::{evaluate, evaluate_snapshot, HealthAssessment, Verdict};
pub use returns::{analyze, log_returns, ReturnStatistics};
