//! Command-line options for the chartfeed server.
//!
//! | Option | Env | Default |
//! |--------|-----|---------|
//! | `--host` | `CHARTFEED_HOST` | `0.0.0.0` |
//! | `--port` | `PORT` | `8000` |
//! | `--request-timeout-secs` | `CHARTFEED_REQUEST_TIMEOUT_SECS` | `60` |
//! | `--log-format` | `CHARTFEED_LOG_FORMAT` | `text` |
//!
//! Fetch-pipeline knobs (pacing, retries, providers) are read separately by
//! `chartfeed_core::FeedConfig::from_env`.

use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Market-data facade over the TradingView scanner and Yahoo chart API.
#[derive(Debug, Clone, Parser)]
#[command(name = "chartfeed", author, version, about)]
pub struct Cli {
    /// Interface to bind.
    #[arg(long, env = "CHARTFEED_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Upper bound on a whole request, pacing and retries included.
    #[arg(long, env = "CHARTFEED_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    /// Log output format.
    #[arg(long, env = "CHARTFEED_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines with target and line number.
    Text,
    /// One JSON object per event.
    Json,
}
