use std::sync::Arc;

use chartfeed_core::{
    CandleSource, Clock, FeedConfig, HttpClient, IndicatorFetcher, IndicatorSource,
    MarketDataService, ReqwestHttpClient, SystemClock, TradingViewAdapter, YahooAdapter,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogFormat;

pub struct AppState {
    pub service: MarketDataService,
}

impl AppState {
    pub fn new(service: MarketDataService) -> Arc<Self> {
        Arc::new(Self { service })
    }
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Wires the live providers; the candle provider only when enabled.
pub fn build_state(config: &FeedConfig) -> Arc<AppState> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());

    let indicators: Arc<dyn IndicatorSource> = Arc::new(TradingViewAdapter::new(
        http_client.clone(),
        config.upstream_timeout,
    ));
    let candles = config.historical_enabled.then(|| {
        Arc::new(YahooAdapter::new(http_client, config.upstream_timeout)) as Arc<dyn CandleSource>
    });
    if candles.is_none() {
        tracing::info!("historical provider disabled; /get-historical will answer 501");
    }

    let fetcher = IndicatorFetcher::from_config(indicators, config, clock.clone());
    AppState::new(MarketDataService::new(
        fetcher,
        candles,
        clock,
        config.timeframe_pause,
    ))
}
