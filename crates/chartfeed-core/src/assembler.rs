//! Response assembly for the three query modes.
//!
//! | Mode | Method | Providers |
//! |------|--------|-----------|
//! | single timeframe | [`MarketDataService::single_timeframe`] | indicators |
//! | multi timeframe | [`MarketDataService::multi_timeframe`] | indicators x3, sequential |
//! | historical with levels | [`MarketDataService::historical_with_levels`] | candles + indicators |

use std::sync::Arc;
use std::time::Duration;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::info;

use crate::clock::Clock;
use crate::data_source::{CandleRequest, CandleSource};
use crate::fetcher::IndicatorFetcher;
use crate::levels::{compute_levels, PriceActionLevels};
use crate::{Candle, FeedError, IndicatorSnapshot, Query, Recommendation, Timeframe, UtcDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBlock {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendBlock {
    pub recommendation: Recommendation,
    pub buy_signals: u32,
    pub sell_signals: u32,
    pub neutral_signals: u32,
}

/// Named indicators of the single-timeframe report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorBlock {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub sma20: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub atr: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub adx: f64,
}

impl IndicatorBlock {
    fn from_snapshot(snapshot: &IndicatorSnapshot) -> Self {
        Self {
            rsi: snapshot.value("RSI"),
            macd: snapshot.value("MACD.macd"),
            macd_signal: snapshot.value("MACD.signal"),
            ema20: snapshot.value("EMA20"),
            ema50: snapshot.value("EMA50"),
            ema200: snapshot.value("EMA200"),
            sma20: snapshot.value("SMA20"),
            sma50: snapshot.value("SMA50"),
            sma200: snapshot.value("SMA200"),
            atr: snapshot.value("ATR"),
            stoch_k: snapshot.value("Stoch.K"),
            stoch_d: snapshot.value("Stoch.D"),
            bb_upper: snapshot.value("BB.upper"),
            bb_lower: snapshot.value("BB.lower"),
            adx: snapshot.value("ADX"),
        }
    }
}

/// Reduced indicator set attached to the historical report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurrentIndicators {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub ema20: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub atr: f64,
    pub adx: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
}

impl CurrentIndicators {
    fn from_snapshot(snapshot: &IndicatorSnapshot) -> Self {
        Self {
            rsi: snapshot.value("RSI"),
            macd: snapshot.value("MACD.macd"),
            macd_signal: snapshot.value("MACD.signal"),
            ema20: snapshot.value("EMA20"),
            ema50: snapshot.value("EMA50"),
            ema200: snapshot.value("EMA200"),
            atr: snapshot.value("ATR"),
            adx: snapshot.value("ADX"),
            bb_upper: snapshot.value("BB.upper"),
            bb_lower: snapshot.value("BB.lower"),
        }
    }
}

/// Single-timeframe report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeReport {
    pub symbol: String,
    pub exchange: String,
    pub screener: String,
    /// Timeframe code as the caller sent it.
    pub timeframe: String,
    pub timestamp: UtcDateTime,
    pub price: PriceBlock,
    pub trend: TrendBlock,
    pub indicators: IndicatorBlock,
    pub oscillators_summary: Recommendation,
    pub ma_summary: Recommendation,
}

impl TimeframeReport {
    pub fn from_snapshot(query: &Query, snapshot: &IndicatorSnapshot) -> Self {
        Self {
            symbol: query.symbol().as_str().to_owned(),
            exchange: query.exchange().to_owned(),
            screener: query.screener().to_owned(),
            timeframe: query.timeframe_code().to_owned(),
            timestamp: snapshot.as_of,
            price: PriceBlock {
                open: snapshot.value("open"),
                high: snapshot.value("high"),
                low: snapshot.value("low"),
                close: snapshot.value("close"),
                volume: snapshot.value("volume"),
            },
            trend: TrendBlock {
                recommendation: snapshot.summary.recommendation,
                buy_signals: snapshot.summary.buy,
                sell_signals: snapshot.summary.sell,
                neutral_signals: snapshot.summary.neutral,
            },
            indicators: IndicatorBlock::from_snapshot(snapshot),
            oscillators_summary: snapshot.oscillators.recommendation,
            ma_summary: snapshot.moving_averages.recommendation,
        }
    }
}

/// Reports keyed by timeframe, serialized in fetch order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiTimeframeReport {
    entries: Vec<(Timeframe, TimeframeReport)>,
}

impl MultiTimeframeReport {
    pub fn get(&self, timeframe: Timeframe) -> Option<&TimeframeReport> {
        self.entries
            .iter()
            .find(|(tf, _)| *tf == timeframe)
            .map(|(_, report)| report)
    }

    pub fn timeframes(&self) -> impl Iterator<Item = Timeframe> + '_ {
        self.entries.iter().map(|(tf, _)| *tf)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MultiTimeframeReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (timeframe, report) in &self.entries {
            map.serialize_entry(timeframe.as_str(), report)?;
        }
        map.end()
    }
}

/// Candle series with derived levels and the current indicator reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalReport {
    pub symbol: String,
    /// Ticker in the historical provider's vocabulary.
    pub ticker: String,
    pub timeframe: String,
    pub lookback_days: u32,
    pub candle_count: usize,
    pub candles: Vec<Candle>,
    /// `None` when fewer than seven candles came back.
    pub levels: Option<PriceActionLevels>,
    pub current_indicators: CurrentIndicators,
    pub recommendation: Recommendation,
}

/// Composes provider results into the three response shapes.
#[derive(Clone)]
pub struct MarketDataService {
    fetcher: IndicatorFetcher,
    candles: Option<Arc<dyn CandleSource>>,
    clock: Arc<dyn Clock>,
    timeframe_pause: Duration,
}

impl MarketDataService {
    pub fn new(
        fetcher: IndicatorFetcher,
        candles: Option<Arc<dyn CandleSource>>,
        clock: Arc<dyn Clock>,
        timeframe_pause: Duration,
    ) -> Self {
        Self {
            fetcher,
            candles,
            clock,
            timeframe_pause,
        }
    }

    pub fn historical_available(&self) -> bool {
        self.candles.is_some()
    }

    pub async fn single_timeframe(&self, query: &Query) -> Result<TimeframeReport, FeedError> {
        let snapshot = self.fetcher.fetch_indicators(query).await?;
        Ok(TimeframeReport::from_snapshot(query, &snapshot))
    }

    /// Runs [`Timeframe::MULTI`] one after another, pausing between calls.
    ///
    /// # Errors
    ///
    /// The first failing timeframe fails the whole call; earlier reports are
    /// discarded.
    pub async fn multi_timeframe(&self, query: &Query) -> Result<MultiTimeframeReport, FeedError> {
        let mut report = MultiTimeframeReport::default();

        for (index, timeframe) in Timeframe::MULTI.into_iter().enumerate() {
            if index > 0 {
                self.clock.sleep(self.timeframe_pause).await;
            }
            let entry = self.single_timeframe(&query.for_timeframe(timeframe)).await?;
            report.entries.push((timeframe, entry));
        }

        info!(
            symbol = %query.symbol(),
            timeframes = report.len(),
            "multi-timeframe report assembled"
        );
        Ok(report)
    }

    /// Fetches candles for the lookback window, derives levels and attaches
    /// one live indicator reading.
    ///
    /// # Errors
    ///
    /// - [`FeedError::UnsupportedFeature`] when no candle provider is wired in.
    /// - [`FeedError::NotFound`] when the provider returns no candles.
    /// - [`FeedError::Upstream`] when either provider fails.
    pub async fn historical_with_levels(&self, query: &Query) -> Result<HistoricalReport, FeedError> {
        let source = self.candles.as_ref().ok_or(FeedError::UnsupportedFeature {
            feature: "historical data",
        })?;

        let request = CandleRequest::from_query(query);
        let candles = source.candles(request.clone()).await?;
        if candles.is_empty() {
            return Err(FeedError::not_found(format!(
                "no historical data for {} over {}",
                request.ticker, request.period
            )));
        }

        let levels = compute_levels(&candles);
        let snapshot = self.fetcher.fetch_indicators(query).await?;

        info!(
            symbol = %query.symbol(),
            ticker = %request.ticker,
            candles = candles.len(),
            has_levels = levels.is_some(),
            "historical report assembled"
        );

        Ok(HistoricalReport {
            symbol: query.symbol().as_str().to_owned(),
            ticker: request.ticker,
            timeframe: query.timeframe_code().to_owned(),
            lookback_days: query.lookback_days(),
            candle_count: candles.len(),
            candles,
            levels,
            current_indicators: CurrentIndicators::from_snapshot(&snapshot),
            recommendation: snapshot.summary.recommendation,
        })
    }
}
