//! Recommendation tally over the scanner's indicator columns.
//!
//! The scanner publishes three rating scores (`Recommend.All`,
//! `Recommend.Other`, `Recommend.MA`) but not the vote counts behind them.
//! The counts are rebuilt here from the raw columns with the same per-indicator
//! rules the provider's own client applies. An indicator whose inputs are
//! missing casts no vote.

use std::collections::BTreeMap;

use crate::{Recommendation, Vote, VoteSummary};

/// Moving-average lengths compared against the close, for both EMA and SMA.
pub const MA_LENGTHS: [u32; 6] = [10, 20, 30, 50, 100, 200];

/// Pre-computed `Rec.*` columns counted on the moving-average side.
const MA_RATING_COLUMNS: [&str; 3] = ["Rec.Ichimoku", "Rec.VWMA", "Rec.HullMA9"];

/// Pre-computed `Rec.*` columns counted on the oscillator side.
const OSCILLATOR_RATING_COLUMNS: [&str; 4] = ["Rec.Stoch.RSI", "Rec.WR", "Rec.BBPower", "Rec.UO"];

/// Summaries derived from one scanner row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ratings {
    pub summary: VoteSummary,
    pub oscillators: VoteSummary,
    pub moving_averages: VoteSummary,
}

/// Builds the overall, oscillator and moving-average summaries.
///
/// The overall counts are the sum of the two groups; each recommendation
/// comes from its score column, neutral when the column is absent.
pub fn rate(values: &BTreeMap<String, f64>) -> Ratings {
    let score = |key: &str| {
        values
            .get(key)
            .map_or(Recommendation::Neutral, |s| Recommendation::from_score(*s))
    };

    let oscillators = VoteSummary::tally(score("Recommend.Other"), &oscillator_votes(values));
    let moving_averages = VoteSummary::tally(score("Recommend.MA"), &moving_average_votes(values));
    let summary = VoteSummary {
        recommendation: score("Recommend.All"),
        ..VoteSummary::default()
    }
    .merged_counts(&oscillators)
    .merged_counts(&moving_averages);

    Ratings {
        summary,
        oscillators,
        moving_averages,
    }
}

pub fn moving_average_votes(values: &BTreeMap<String, f64>) -> Vec<Vote> {
    let get = |key: &str| values.get(key).copied();
    let mut votes = Vec::new();

    if let Some(close) = get("close") {
        for length in MA_LENGTHS {
            for family in ["EMA", "SMA"] {
                if let Some(ma) = get(&format!("{family}{length}")) {
                    votes.push(moving_average(ma, close));
                }
            }
        }
    }
    votes.extend(MA_RATING_COLUMNS.iter().filter_map(|key| get(key).map(simple)));
    votes
}

pub fn oscillator_votes(values: &BTreeMap<String, f64>) -> Vec<Vote> {
    let get = |key: &str| values.get(key).copied();
    let mut votes = Vec::new();

    if let (Some(rsi), Some(prev)) = (get("RSI"), get("RSI[1]")) {
        votes.push(relative_strength(rsi, prev));
    }
    if let (Some(k), Some(d), Some(k1), Some(d1)) =
        (get("Stoch.K"), get("Stoch.D"), get("Stoch.K[1]"), get("Stoch.D[1]"))
    {
        votes.push(stochastic(k, d, k1, d1));
    }
    if let (Some(cci), Some(prev)) = (get("CCI20"), get("CCI20[1]")) {
        votes.push(commodity_channel(cci, prev));
    }
    if let (Some(adx), Some(plus), Some(minus), Some(plus1), Some(minus1)) = (
        get("ADX"),
        get("ADX+DI"),
        get("ADX-DI"),
        get("ADX+DI[1]"),
        get("ADX-DI[1]"),
    ) {
        votes.push(directional(adx, plus, minus, plus1, minus1));
    }
    if let (Some(ao), Some(ao1), Some(ao2)) = (get("AO"), get("AO[1]"), get("AO[2]")) {
        votes.push(awesome(ao, ao1, ao2));
    }
    if let (Some(mom), Some(prev)) = (get("Mom"), get("Mom[1]")) {
        votes.push(momentum(mom, prev));
    }
    if let (Some(macd), Some(signal)) = (get("MACD.macd"), get("MACD.signal")) {
        votes.push(crossover(macd, signal));
    }
    votes.extend(
        OSCILLATOR_RATING_COLUMNS
            .iter()
            .filter_map(|key| get(key).map(simple)),
    );
    votes
}

fn moving_average(ma: f64, close: f64) -> Vote {
    if ma < close {
        Vote::Buy
    } else if ma > close {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}

fn relative_strength(rsi: f64, prev: f64) -> Vote {
    if rsi < 30.0 && prev < rsi {
        Vote::Buy
    } else if rsi > 70.0 && prev > rsi {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}

fn stochastic(k: f64, d: f64, k1: f64, d1: f64) -> Vote {
    if k < 20.0 && d < 20.0 && k > d && k1 < d1 {
        Vote::Buy
    } else if k > 80.0 && d > 80.0 && k < d && k1 > d1 {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}

fn commodity_channel(cci: f64, prev: f64) -> Vote {
    if cci < -100.0 && cci > prev {
        Vote::Buy
    } else if cci > 100.0 && cci < prev {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}

fn directional(adx: f64, plus: f64, minus: f64, plus1: f64, minus1: f64) -> Vote {
    if adx > 20.0 && plus1 < minus1 && plus > minus {
        Vote::Buy
    } else if adx > 20.0 && plus1 > minus1 && plus < minus {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}

fn awesome(ao: f64, ao1: f64, ao2: f64) -> Vote {
    let saucer_up = ao > 0.0 && ao1 > 0.0 && ao > ao1 && ao2 > ao1;
    let saucer_down = ao < 0.0 && ao1 < 0.0 && ao < ao1 && ao2 < ao1;

    if (ao > 0.0 && ao1 < 0.0) || saucer_up {
        Vote::Buy
    } else if (ao < 0.0 && ao1 > 0.0) || saucer_down {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}

fn momentum(mom: f64, prev: f64) -> Vote {
    if mom > prev {
        Vote::Buy
    } else if mom < prev {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}

fn crossover(line: f64, signal: f64) -> Vote {
    if line > signal {
        Vote::Buy
    } else if line < signal {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}

/// `Rec.*` columns are already `-1`, `0` or `1`.
fn simple(rating: f64) -> Vote {
    if rating == 1.0 {
        Vote::Buy
    } else if rating == -1.0 {
        Vote::Sell
    } else {
        Vote::Neutral
    }
}
