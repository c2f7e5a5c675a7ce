//! Bounded retry policy with pluggable backoff.

use std::str::FromStr;
use std::time::Duration;

/// Ceiling for configured exponential backoff.
const EXPONENTIAL_MAX: Duration = Duration::from_secs(30);

/// Backoff strategy between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay after every failure.
    Fixed {
        delay: Duration,
    },
    /// Delay grows by `step` per failed attempt: `attempt * step`.
    Linear {
        step: Duration,
    },
    /// Delay is `base * factor ^ (attempt - 1)`, capped at `max`.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        /// Whether to apply random jitter (+/- 50%) to the delay.
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Linear {
            step: Duration::from_secs(2),
        }
    }
}

/// Backoff family selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffKind {
    Fixed,
    Linear,
    Exponential,
}

impl FromStr for BackoffKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "linear" => Ok(Self::Linear),
            "exponential" => Ok(Self::Exponential),
            other => Err(format!("unknown backoff kind '{other}'")),
        }
    }
}

impl Backoff {
    /// Backoff of `kind` built around one configured `step`.
    ///
    /// Exponential backoff doubles from `step`, is jittered and capped at 30 s.
    pub fn from_kind(kind: BackoffKind, step: Duration) -> Self {
        match kind {
            BackoffKind::Fixed => Self::Fixed { delay: step },
            BackoffKind::Linear => Self::Linear { step },
            BackoffKind::Exponential => Self::Exponential {
                base: step,
                factor: 2.0,
                max: EXPONENTIAL_MAX,
                jitter: true,
            },
        }
    }

    /// Delay to wait after the `attempt`-th failure (1-based).
    pub fn delay(self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self {
            Self::Fixed { delay } => delay,
            Self::Linear { step } => step.saturating_mul(attempt),
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt as i32 - 1);
                let seconds = (base.as_secs_f64() * scale).min(max.as_secs_f64());
                let delay = Duration::from_secs_f64(seconds);

                if !jitter {
                    return delay;
                }

                let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
                let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                let total_ms = delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
                Duration::from_millis(total_ms.max(0) as u64)
            }
        }
    }
}

/// How many times a provider call is attempted and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first; never below one.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Linear { step },
        }
    }

    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed { delay },
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::Fixed {
                delay: Duration::ZERO,
            },
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay before the next attempt after `attempt` failed, or `None` once
    /// the budget is spent.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.attempts()).then(|| self.backoff.delay(attempt))
    }
}
