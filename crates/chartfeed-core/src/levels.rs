use serde::{Deserialize, Serialize};

use crate::Candle;

/// Fewest candles needed before levels are reported.
pub const MIN_CANDLES: usize = 7;

/// Size of the "last 3 days" window, in candles.
///
/// Fixed at 72 (three days of hourly bars) for every timeframe.
pub const RECENT_WINDOW: usize = 72;

/// Position reported when the period has no range.
pub const FLAT_RANGE_POSITION: f64 = 50.0;

/// Support/resistance statistics derived from a candle series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceActionLevels {
    pub period_high: f64,
    pub period_low: f64,
    pub period_range: f64,
    pub recent_high_3d: f64,
    pub recent_low_3d: f64,
    pub avg_candle_range: f64,
    /// Last close as a percentage of the period range; 50 when the range is zero.
    pub current_position_in_range: f64,
}

/// Derives levels from `candles` (oldest first).
///
/// Returns `None` when fewer than [`MIN_CANDLES`] candles are supplied.
pub fn compute_levels(candles: &[Candle]) -> Option<PriceActionLevels> {
    if candles.len() < MIN_CANDLES {
        return None;
    }
    let last = candles.last()?;

    let (period_high, period_low) = extremes(candles);
    let period_range = period_high - period_low;

    let recent = &candles[candles.len().saturating_sub(RECENT_WINDOW)..];
    let (recent_high_3d, recent_low_3d) = extremes(recent);

    let avg_candle_range =
        candles.iter().map(Candle::range).sum::<f64>() / candles.len() as f64;

    let current_position_in_range = if period_range > 0.0 {
        (last.close - period_low) / period_range * 100.0
    } else {
        FLAT_RANGE_POSITION
    };

    Some(PriceActionLevels {
        period_high,
        period_low,
        period_range,
        recent_high_3d,
        recent_low_3d,
        avg_candle_range,
        current_position_in_range,
    })
}

fn extremes(candles: &[Candle]) -> (f64, f64) {
    candles.iter().fold(
        (f64::NEG_INFINITY, f64::INFINITY),
        |(high, low), candle| (high.max(candle.high), low.min(candle.low)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UtcDateTime;

    fn candle(index: i64, high: f64, low: f64, close: f64) -> Candle {
        let ts = UtcDateTime::from_unix_seconds(1_704_067_200 + index * 3_600).expect("in range");
        Candle::new(ts, close, high, low, close, 100.0).expect("valid candle")
    }

    #[test]
    fn six_candles_are_not_enough() {
        let candles: Vec<_> = (0..6).map(|i| candle(i, 2.0, 1.0, 1.5)).collect();
        assert_eq!(compute_levels(&candles), None);
        assert_eq!(compute_levels(&[]), None);
    }

    #[test]
    fn seven_candles_are_enough() {
        let candles: Vec<_> = (0..7).map(|i| candle(i, 2.0, 1.0, 1.5)).collect();
        assert!(compute_levels(&candles).is_some());
    }

    #[test]
    fn recent_window_covers_only_the_last_72_candles() {
        // An early spike outside the window must not leak into the recent levels.
        let mut candles = vec![candle(0, 500.0, 0.5, 250.0)];
        candles.extend((1..=100).map(|i| candle(i, 12.0, 10.0, 11.0)));

        let levels = compute_levels(&candles).expect("enough candles");

        assert_eq!(levels.period_high, 500.0);
        assert_eq!(levels.period_low, 0.5);
        assert_eq!(levels.recent_high_3d, 12.0);
        assert_eq!(levels.recent_low_3d, 10.0);
    }

    #[test]
    fn flat_series_sits_in_the_middle() {
        let candles: Vec<_> = (0..10).map(|i| candle(i, 1.1, 1.1, 1.1)).collect();
        let levels = compute_levels(&candles).expect("enough candles");

        assert_eq!(levels.period_range, 0.0);
        assert_eq!(levels.avg_candle_range, 0.0);
        assert_eq!(levels.current_position_in_range, 50.0);
    }

    #[test]
    fn average_range_is_the_mean_of_high_minus_low() {
        let candles = vec![
            candle(0, 2.0, 1.0, 1.5),
            candle(1, 4.0, 1.0, 2.0),
            candle(2, 3.0, 2.0, 2.5),
            candle(3, 3.0, 1.0, 2.0),
            candle(4, 5.0, 4.0, 4.5),
            candle(5, 6.0, 3.0, 5.0),
            candle(6, 4.0, 3.0, 3.5),
        ];
        let levels = compute_levels(&candles).expect("enough candles");

        assert!((levels.avg_candle_range - 12.0 / 7.0).abs() < 1e-12);
        assert!((levels.current_position_in_range - 50.0).abs() < 1e-12);
    }
}
