use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::UtcDateTime;

/// Rating published by the indicator provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    #[default]
    Neutral,
    Sell,
    StrongSell,
}

impl Recommendation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        }
    }

    /// Maps a provider rating score in `[-1, 1]` onto a recommendation.
    ///
    /// Scores outside the range (or NaN) are treated as neutral.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if (-1.0..-0.5).contains(&s) => Self::StrongSell,
            s if (-0.5..-0.1).contains(&s) => Self::Sell,
            s if (-0.1..=0.1).contains(&s) => Self::Neutral,
            s if s > 0.1 && s <= 0.5 => Self::Buy,
            s if s > 0.5 && s <= 1.0 => Self::StrongBuy,
            _ => Self::Neutral,
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single indicator vote used when tallying a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Buy,
    Sell,
    Neutral,
}

/// Recommendation plus the buy/sell/neutral vote counts behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteSummary {
    pub recommendation: Recommendation,
    pub buy: u32,
    pub sell: u32,
    pub neutral: u32,
}

impl VoteSummary {
    pub fn tally(recommendation: Recommendation, votes: &[Vote]) -> Self {
        let mut summary = Self {
            recommendation,
            ..Self::default()
        };
        for vote in votes {
            match vote {
                Vote::Buy => summary.buy += 1,
                Vote::Sell => summary.sell += 1,
                Vote::Neutral => summary.neutral += 1,
            }
        }
        summary
    }

    /// Adds the counts of `other` while keeping this summary's recommendation.
    pub fn merged_counts(mut self, other: &Self) -> Self {
        self.buy += other.buy;
        self.sell += other.sell;
        self.neutral += other.neutral;
        self
    }
}

/// Point-in-time indicator values for one instrument and timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub values: BTreeMap<String, f64>,
    pub summary: VoteSummary,
    pub oscillators: VoteSummary,
    pub moving_averages: VoteSummary,
    pub as_of: UtcDateTime,
}

impl IndicatorSnapshot {
    pub fn new(values: BTreeMap<String, f64>) -> Self {
        Self {
            values,
            summary: VoteSummary::default(),
            oscillators: VoteSummary::default(),
            moving_averages: VoteSummary::default(),
            as_of: UtcDateTime::now(),
        }
    }

    pub fn with_summaries(
        mut self,
        summary: VoteSummary,
        oscillators: VoteSummary,
        moving_averages: VoteSummary,
    ) -> Self {
        self.summary = summary;
        self.oscillators = oscillators;
        self.moving_averages = moving_averages;
        self
    }

    /// Indicator value by provider key; absent keys read as `0`.
    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}
