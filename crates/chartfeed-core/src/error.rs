use thiserror::Error;

use crate::data_source::SourceError;

/// Validation errors raised while building inbound queries and domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("invalid timeframe '{value}', expected one of 1m, 5m, 15m, 1h, 4h, 1d")]
    InvalidTimeframe { value: String },

    #[error("field '{field}' cannot be empty")]
    EmptyField { field: &'static str },
    #[error("lookback_days must be a positive integer")]
    InvalidLookback,

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("candle high must be >= low")]
    InvalidCandleRange,
}

/// Request-level failures surfaced by the fetcher and the response assembler.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeedError {
    /// A provider call failed; for the indicator provider this is after all retries.
    #[error("{message}")]
    Upstream { message: String },

    /// The historical provider has no candles for the instrument/period.
    #[error("{message}")]
    NotFound { message: String },

    /// An optional collaborator is not available in this deployment.
    #[error("{feature} is not available in this deployment")]
    UnsupportedFeature { feature: &'static str },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl FeedError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "feed.upstream",
            Self::NotFound { .. } => "feed.not_found",
            Self::UnsupportedFeature { .. } => "feed.unsupported_feature",
            Self::Validation(_) => "feed.validation",
        }
    }
}

impl From<SourceError> for FeedError {
    fn from(error: SourceError) -> Self {
        Self::upstream(error.message())
    }
}
