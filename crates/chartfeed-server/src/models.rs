use chartfeed_core::{
    Query, ValidationError, DEFAULT_EXCHANGE, DEFAULT_LOOKBACK_DAYS, DEFAULT_SCREENER,
    DEFAULT_TIMEFRAME,
};
use serde::{Deserialize, Serialize};

/// Request body shared by every data route.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolRequest {
    pub symbol: String,
    #[serde(default = "default_exchange")]
    pub exchange: String,
    #[serde(default = "default_screener")]
    pub screener: String,
    #[serde(default = "default_interval", alias = "timeframe")]
    pub interval: String,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

fn default_exchange() -> String {
    DEFAULT_EXCHANGE.to_string()
}

fn default_screener() -> String {
    DEFAULT_SCREENER.to_string()
}

fn default_interval() -> String {
    DEFAULT_TIMEFRAME.to_string()
}

fn default_lookback_days() -> u32 {
    DEFAULT_LOOKBACK_DAYS
}

impl SymbolRequest {
    pub fn into_query(self) -> Result<Query, ValidationError> {
        Query::parse(&self.symbol)?
            .with_exchange(&self.exchange)?
            .with_screener(&self.screener)?
            .with_timeframe_code(self.interval)
            .with_lookback_days(self.lookback_days)
    }
}

/// Liveness document served at `/`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub version: &'static str,
}

impl ServiceStatus {
    pub fn running() -> Self {
        Self {
            status: "chartfeed API is running",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
