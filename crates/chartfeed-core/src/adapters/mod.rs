//! Provider adapters.
//!
//! | Adapter | Contract | Upstream |
//! |---------|----------|----------|
//! | [`TradingViewAdapter`] | [`crate::IndicatorSource`] | TradingView scanner |
//! | [`YahooAdapter`] | [`crate::CandleSource`] | Yahoo Finance chart API |

pub mod tradingview;
pub mod yahoo;

pub use tradingview::TradingViewAdapter;
pub use yahoo::YahooAdapter;
