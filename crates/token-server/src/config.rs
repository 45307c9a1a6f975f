//! Server Configuration

use token_advisor::MarketConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,

    /// Provider selection, shared with the `token-report` CLI
    pub market: MarketConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());

        Self {
            bind_addr,
            market: MarketConfig::from_lookup(&lookup),
        }
    }
}
