use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// One time-bucketed OHLCV record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        timestamp: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, ValidationError> {
        validate_finite("open", open)?;
        validate_finite("high", high)?;
        validate_finite("low", low)?;
        validate_finite("close", close)?;
        validate_finite("volume", volume)?;

        if high < low {
            return Err(ValidationError::InvalidCandleRange);
        }

        Ok(Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}
