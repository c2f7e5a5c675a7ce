use crate::{Symbol, Timeframe, ValidationError};

pub const DEFAULT_EXCHANGE: &str = "OANDA";
pub const DEFAULT_SCREENER: &str = "forex";
pub const DEFAULT_TIMEFRAME: &str = "1h";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Validated inbound request shared by every query mode.
///
/// The timeframe is kept as the raw code the caller sent so responses can echo
/// it back; [`Query::timeframe`] resolves it, defaulting to one hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    symbol: Symbol,
    exchange: String,
    screener: String,
    timeframe_code: String,
    lookback_days: u32,
}

impl Query {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            exchange: String::from(DEFAULT_EXCHANGE),
            screener: String::from(DEFAULT_SCREENER),
            timeframe_code: String::from(DEFAULT_TIMEFRAME),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn parse(symbol: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(Symbol::parse(symbol)?))
    }

    pub fn with_exchange(mut self, exchange: &str) -> Result<Self, ValidationError> {
        let exchange = exchange.trim();
        if exchange.is_empty() {
            return Err(ValidationError::EmptyField { field: "exchange" });
        }
        self.exchange = exchange.to_ascii_uppercase();
        Ok(self)
    }

    pub fn with_screener(mut self, screener: &str) -> Result<Self, ValidationError> {
        let screener = screener.trim();
        if screener.is_empty() {
            return Err(ValidationError::EmptyField { field: "screener" });
        }
        self.screener = screener.to_ascii_lowercase();
        Ok(self)
    }

    pub fn with_timeframe_code(mut self, code: impl Into<String>) -> Self {
        self.timeframe_code = code.into().trim().to_owned();
        self
    }

    pub fn with_lookback_days(mut self, days: u32) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::InvalidLookback);
        }
        self.lookback_days = days;
        Ok(self)
    }

    /// Copy of this query pinned to `timeframe`.
    pub fn for_timeframe(&self, timeframe: Timeframe) -> Self {
        self.clone().with_timeframe_code(timeframe.as_str())
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn screener(&self) -> &str {
        &self.screener
    }

    pub fn timeframe_code(&self) -> &str {
        &self.timeframe_code
    }

    pub fn timeframe(&self) -> Timeframe {
        Timeframe::resolve(&self.timeframe_code)
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }
}
