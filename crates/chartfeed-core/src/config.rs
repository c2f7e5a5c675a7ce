use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::retry::{Backoff, BackoffKind, RetryPolicy};

/// Runtime knobs for the fetch pipeline.
///
/// # Environment Variables
///
/// | Field | Env Var | Default |
/// |-------|---------|---------|
/// | `min_spacing` | `CHARTFEED_MIN_SPACING_MS` | 500 ms |
/// | `retry.max_attempts` | `CHARTFEED_MAX_ATTEMPTS` | 3 |
/// | `retry.backoff` kind | `CHARTFEED_BACKOFF` (`linear`, `fixed`, `exponential`) | linear |
/// | `retry.backoff` step | `CHARTFEED_BACKOFF_STEP_MS` | 2000 ms |
/// | `timeframe_pause` | `CHARTFEED_TIMEFRAME_PAUSE_MS` | 1000 ms |
/// | `historical_enabled` | `CHARTFEED_HISTORICAL_ENABLED` | true |
/// | `upstream_timeout` | `CHARTFEED_UPSTREAM_TIMEOUT_MS` | 10000 ms |
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    /// Minimum spacing between two dispatches to the indicator provider.
    pub min_spacing: Duration,
    pub retry: RetryPolicy,
    /// Pause between timeframes in the multi-timeframe report.
    pub timeframe_pause: Duration,
    /// Whether the historical candle provider is wired in at startup.
    pub historical_enabled: bool,
    /// Per-call timeout applied by the provider adapters.
    pub upstream_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            min_spacing: Duration::from_millis(500),
            retry: RetryPolicy::default(),
            timeframe_pause: Duration::from_secs(1),
            historical_enabled: true,
            upstream_timeout: Duration::from_secs(10),
        }
    }
}

impl FeedConfig {
    /// Reads overrides from the environment; malformed values keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let step = env_millis("CHARTFEED_BACKOFF_STEP_MS").unwrap_or(match defaults.retry.backoff {
            Backoff::Linear { step } => step,
            _ => Duration::from_secs(2),
        });
        let kind = env_parse("CHARTFEED_BACKOFF").unwrap_or(BackoffKind::Linear);

        Self {
            min_spacing: env_millis("CHARTFEED_MIN_SPACING_MS").unwrap_or(defaults.min_spacing),
            retry: RetryPolicy {
                max_attempts: env_parse("CHARTFEED_MAX_ATTEMPTS")
                    .unwrap_or(defaults.retry.max_attempts),
                backoff: Backoff::from_kind(kind, step),
            },
            timeframe_pause: env_millis("CHARTFEED_TIMEFRAME_PAUSE_MS")
                .unwrap_or(defaults.timeframe_pause),
            historical_enabled: env_parse("CHARTFEED_HISTORICAL_ENABLED")
                .unwrap_or(defaults.historical_enabled),
            upstream_timeout: env_millis("CHARTFEED_UPSTREAM_TIMEOUT_MS")
                .unwrap_or(defaults.upstream_timeout),
        }
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_millis)
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring malformed environment value");
            None
        }
    }
}
