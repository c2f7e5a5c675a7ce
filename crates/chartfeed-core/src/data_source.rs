//! Provider contracts and their request types.
//!
//! | Contract | Request | Response | Provider |
//! |----------|---------|----------|----------|
//! | [`IndicatorSource`] | [`IndicatorRequest`] | [`IndicatorSnapshot`] | live technical indicators |
//! | [`CandleSource`] | [`CandleRequest`] | `Vec<Candle>` | historical OHLCV |
//!
//! Requests are built from a [`Query`] and already carry the provider's own
//! symbol and interval vocabulary (see [`crate::normalizer`]).

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::normalizer;
use crate::{Candle, IndicatorSnapshot, ProviderId, Query, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    SymbolNotFound,
    InvalidResponse,
    Internal,
}

/// Structured provider error returned by adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn symbol_not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::SymbolNotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::SymbolNotFound => "source.symbol_not_found",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request for one live indicator snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorRequest {
    pub symbol: Symbol,
    pub exchange: String,
    pub screener: String,
    /// Interval in the indicator provider's vocabulary.
    pub interval: &'static str,
}

impl IndicatorRequest {
    pub fn from_query(query: &Query) -> Self {
        Self {
            symbol: query.symbol().clone(),
            exchange: query.exchange().to_owned(),
            screener: query.screener().to_owned(),
            interval: normalizer::normalize_interval(
                query.timeframe_code(),
                ProviderId::Tradingview,
            ),
        }
    }

    /// Provider ticker in `EXCHANGE:SYMBOL` form.
    pub fn ticker(&self) -> String {
        normalizer::tradingview_ticker(&self.exchange, &self.symbol)
    }
}

/// Request for a historical candle series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleRequest {
    /// Ticker in the historical provider's vocabulary.
    pub ticker: String,
    /// Interval in the historical provider's vocabulary.
    pub interval: &'static str,
    /// Lookback period string such as `7d`.
    pub period: String,
}

impl CandleRequest {
    pub fn from_query(query: &Query) -> Self {
        Self {
            ticker: normalizer::normalize_symbol(query.symbol(), ProviderId::Yahoo),
            interval: normalizer::normalize_interval(query.timeframe_code(), ProviderId::Yahoo),
            period: normalizer::yahoo_period(query.lookback_days()),
        }
    }
}

/// Live technical-indicator provider.
///
/// Implementations must be `Send + Sync`; one instance serves every request.
pub trait IndicatorSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetches one indicator snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the transport fails, the provider answers
    /// with a non-success status, or the symbol is unknown to the provider.
    fn indicators<'a>(
        &'a self,
        req: IndicatorRequest,
    ) -> Pin<Box<dyn Future<Output = Result<IndicatorSnapshot, SourceError>> + Send + 'a>>;
}

/// Historical OHLCV provider.
pub trait CandleSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetches the candle series for the requested period, oldest first.
    ///
    /// An unsupported instrument or period yields an empty series rather than
    /// an error.
    fn candles<'a>(
        &'a self,
        req: CandleRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Candle>, SourceError>> + Send + 'a>>;
}
