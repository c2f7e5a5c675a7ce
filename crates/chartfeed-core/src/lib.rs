//! # Chartfeed Core
//!
//! Fetch orchestration and normalization for the chartfeed market-data
//! facade.
//!
//! ## Overview
//!
//! - **Normalizer** translating canonical symbols and timeframes into each
//!   provider's vocabulary
//! - **Paced, retrying fetcher** in front of the live-indicator provider
//! - **Price-action levels** derived from a candle series
//! - **Response assembler** for the single-timeframe, multi-timeframe and
//!   historical modes
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (TradingView scanner, Yahoo chart) |
//! | [`assembler`] | Response composition per query mode |
//! | [`clock`] | Injectable time source |
//! | [`config`] | Pipeline configuration from the environment |
//! | [`data_source`] | Provider traits and request types |
//! | [`domain`] | Domain models (Query, Candle, IndicatorSnapshot) |
//! | [`envelope`] | `{success, data}` / `{success, error}` wire envelope |
//! | [`error`] | Validation and request-level errors |
//! | [`fetcher`] | Paced, retrying indicator fetcher |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`levels`] | Support/resistance statistics |
//! | [`normalizer`] | Symbol/interval translation |
//! | [`pacing`] | Minimum spacing between provider dispatches |
//! | [`ratings`] | Recommendation vote tally |
//! | [`retry`] | Retry policy and backoff |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chartfeed_core::{
//!     FeedConfig, IndicatorFetcher, MarketDataService, Query, SystemClock, TradingViewAdapter,
//! };
//!
//! let config = FeedConfig::from_env();
//! let clock = Arc::new(SystemClock);
//! let fetcher = IndicatorFetcher::from_config(
//!     Arc::new(TradingViewAdapter::default()),
//!     &config,
//!     clock.clone(),
//! );
//! let service = MarketDataService::new(fetcher, None, clock, config.timeframe_pause);
//!
//! let report = service.single_timeframe(&Query::parse("EURUSD")?).await?;
//! println!("{}: {}", report.symbol, report.trend.recommendation);
//! ```

pub mod adapters;
pub mod assembler;
pub mod clock;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod levels;
pub mod normalizer;
pub mod pacing;
pub mod ratings;
pub mod retry;
pub mod source;

pub use adapters::{TradingViewAdapter, YahooAdapter};
pub use assembler::{
    CurrentIndicators, HistoricalReport, IndicatorBlock, MarketDataService, MultiTimeframeReport,
    PriceBlock, TimeframeReport, TrendBlock,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FeedConfig;
pub use data_source::{
    CandleRequest, CandleSource, IndicatorRequest, IndicatorSource, SourceError, SourceErrorKind,
};
pub use domain::{
    Candle, IndicatorSnapshot, Query, Recommendation, Symbol, Timeframe, UtcDateTime, Vote,
    VoteSummary, DEFAULT_EXCHANGE, DEFAULT_LOOKBACK_DAYS, DEFAULT_SCREENER, DEFAULT_TIMEFRAME,
};
pub use envelope::Envelope;
pub use error::{FeedError, ValidationError};
pub use fetcher::IndicatorFetcher;
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient,
};
pub use levels::{compute_levels, PriceActionLevels};
pub use pacing::Pacer;
pub use retry::{Backoff, BackoffKind, RetryPolicy};
pub use source::ProviderId;
