//! Error Types for Token Advisor

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    /// Rejected before the pipeline runs
    #[error("Input error: {0}")]
    InvalidInput(#[from] InputError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdvisorError {
    /// Message suitable for showing to the person who typed the input
    pub fn user_message(&self) -> String {
        match self {
            AdvisorError::InvalidInput(InputError::EmptyIdentifier) => {
                "Please enter a coin name or identifier.".into()
            }
            AdvisorError::InvalidInput(InputError::InvalidAmount(_)) => {
                "Please enter a valid positive investment amount in USD.".into()
            }
            AdvisorError::MarketData(MarketDataError::NotFound(id)) => {
                format!("Coin '{id}' was not found.")
            }
            AdvisorError::MarketData(MarketDataError::Unavailable(_)) => {
                "Market data is currently unavailable. Please try again.".into()
            }
            AdvisorError::Analysis(_) => "Not enough price history to analyze this coin.".into(),
            AdvisorError::Config(msg) => format!("Configuration problem: {msg}"),
        }
    }
}

/// User input that never reaches the pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("coin identifier is empty")]
    EmptyIdentifier,

    #[error("{0}")]
    InvalidAmount(String),
}

/// Negative outcome of a market data lookup.
///
/// Both variants route to the suggestion fallback; the split is kept so
/// callers can tell an unknown coin from a provider outage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("Coin not found: {0}")]
    NotFound(String),

    #[error("Market data unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        MarketDataError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for MarketDataError {
    fn from(err: serde_json::Error) -> Self {
        MarketDataError::Unavailable(format!("malformed response: {err}"))
    }
}

/// Price history that cannot produce return statistics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient price history: {samples} sample(s), need at least 2")]
    InsufficientHistory { samples: usize },

    #[error("Invalid price {price} at sample {index}")]
    InvalidPrice { index: usize, price: f64 },
}
