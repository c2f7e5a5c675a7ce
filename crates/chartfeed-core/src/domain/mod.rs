//! # Domain Models
//!
//! Canonical domain types shared by the normalizer, the fetcher and the
//! response assembler.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Query`] | Validated inbound request (symbol, exchange, screener, timeframe, lookback) |
//! | [`Symbol`] | Canonical uppercase instrument code |
//! | [`Timeframe`] | Canonical timeframe code (1m, 5m, 15m, 1h, 4h, 1d) |
//! | [`Candle`] | OHLCV record with a UTC timestamp |
//! | [`IndicatorSnapshot`] | Provider indicator values plus vote summaries |
//! | [`UtcDateTime`] | UTC timestamp |

mod candle;
mod indicators;
mod query;
mod symbol;
mod timeframe;
mod timestamp;

pub use candle::Candle;
pub use indicators::{IndicatorSnapshot, Recommendation, Vote, VoteSummary};
pub use query::{
    Query, DEFAULT_EXCHANGE, DEFAULT_LOOKBACK_DAYS, DEFAULT_SCREENER, DEFAULT_TIMEFRAME,
};
pub use symbol::Symbol;
pub use timeframe::Timeframe;
pub use timestamp::UtcDateTime;
