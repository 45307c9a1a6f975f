//! Application State

use std::sync::Arc;

use token_advisor::{MarketDataClient, ReportAssembler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Report pipeline; stateless apart from its client handle
    pub assembler: ReportAssembler,
}

impl AppState {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self {
            assembler: ReportAssembler::new(market),
        }
    }

    pub fn market(&self) -> &Arc<dyn MarketDataClient> {
        self.assembler.market()
    }
}
