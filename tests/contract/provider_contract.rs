//! Contract tests for the real provider adapters.
//!
//! The TradingView and Yahoo adapters run against a scripted transport and are
//! wired through the fetcher and the service, so wire parsing, pacing and
//! report assembly are checked together.

use std::sync::Arc;
use std::time::Duration;

use chartfeed_core::adapters::tradingview::COLUMNS;
use chartfeed_core::{
    CandleSource, FeedError, HttpError, HttpResponse, IndicatorSource, ManualClock, ProviderId,
    Query, Recommendation, ScriptedHttpClient, TradingViewAdapter, YahooAdapter,
};
use chartfeed_tests::{default_fetcher, service};
use serde_json::{json, Value};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Scanner answer with every column null except the ones given.
fn scan_body(cells: &[(&str, Value)]) -> String {
    let mut d = vec![Value::Null; COLUMNS.len()];
    for (name, value) in cells {
        let index = COLUMNS
            .iter()
            .position(|c| c == name)
            .expect("known column");
        d[index] = value.clone();
    }
    json!({"totalCount": 1, "data": [{"s": "OANDA:EURUSD", "d": d}]}).to_string()
}

/// Chart answer with `len` hourly candles climbing by one cent each.
fn chart_body(len: usize) -> String {
    let timestamps: Vec<i64> = (0..len as i64).map(|i| 1_704_067_200 + i * 3_600).collect();
    let base: Vec<f64> = (0..len).map(|i| 1.10 + i as f64 * 0.01).collect();
    json!({
        "chart": {
            "result": [{
                "meta": {"symbol": "EURUSD=X"},
                "timestamp": timestamps,
                "indicators": {"quote": [{
                    "open": base,
                    "high": base.iter().map(|v| v + 0.005).collect::<Vec<_>>(),
                    "low": base.iter().map(|v| v - 0.005).collect::<Vec<_>>(),
                    "close": base,
                    "volume": vec![0; len],
                }]}
            }],
            "error": null
        }
    })
    .to_string()
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn adapters_report_their_provider_identity() {
    let http = Arc::new(ScriptedHttpClient::default());

    let indicators = TradingViewAdapter::new(http.clone(), TIMEOUT);
    let candles = YahooAdapter::new(http, TIMEOUT);

    assert_eq!(IndicatorSource::id(&indicators), ProviderId::Tradingview);
    assert_eq!(CandleSource::id(&candles), ProviderId::Yahoo);
}

// =============================================================================
// TradingView through the fetcher
// =============================================================================

#[tokio::test]
async fn when_scanner_answers_a_single_timeframe_report_is_assembled() {
    // Given: A scanner row with price, averages and a positive overall score
    let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        scan_body(&[
            ("Recommend.All", json!(0.6)),
            ("Recommend.MA", json!(0.8)),
            ("Recommend.Other", json!(-0.05)),
            ("open", json!(1.0801)),
            ("high", json!(1.0855)),
            ("low", json!(1.0790)),
            ("close", json!(1.0842)),
            ("RSI", json!(58.3)),
            ("EMA50", json!(1.0790)),
            ("SMA200", json!(1.0700)),
        ]),
    ))]));
    let clock = Arc::new(ManualClock::new());
    let adapter = Arc::new(TradingViewAdapter::new(http.clone(), TIMEOUT));
    let service = service(adapter, None, clock);

    // When
    let report = service
        .single_timeframe(&Query::parse("eurusd").expect("valid"))
        .await
        .expect("report");

    // Then: Values land in their blocks, absent columns read as zero
    assert_eq!(report.symbol, "EURUSD");
    assert_eq!(report.price.close, 1.0842);
    assert_eq!(report.price.volume, 0.0);
    assert_eq!(report.indicators.rsi, 58.3);
    assert_eq!(report.indicators.ema50, 1.0790);
    assert_eq!(report.indicators.adx, 0.0);
    assert_eq!(report.trend.recommendation, Recommendation::StrongBuy);
    assert_eq!(report.ma_summary, Recommendation::StrongBuy);
    assert_eq!(report.oscillators_summary, Recommendation::Neutral);

    // And: The scan was posted to the forex screener for the hourly columns
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://scanner.tradingview.com/forex/scan");
    let body: Value =
        serde_json::from_str(requests[0].body.as_deref().expect("body")).expect("json body");
    assert_eq!(body["symbols"]["tickers"], json!(["OANDA:EURUSD"]));
    assert_eq!(body["columns"][0], json!("Recommend.Other|60"));
}

#[tokio::test]
async fn when_daily_timeframe_is_requested_columns_carry_no_suffix() {
    // Given
    let http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        scan_body(&[("close", json!(64_000.0))]),
    ))]));
    let clock = Arc::new(ManualClock::new());
    let adapter = Arc::new(TradingViewAdapter::new(http.clone(), TIMEOUT));
    let fetcher = default_fetcher(adapter, clock);
    let query = Query::parse("BTCUSD")
        .expect("valid")
        .with_exchange("binance")
        .expect("non-empty")
        .with_screener("crypto")
        .expect("non-empty")
        .with_timeframe_code("1d");

    // When
    fetcher.fetch_indicators(&query).await.expect("snapshot");

    // Then
    let requests = http.requests();
    assert_eq!(requests[0].url, "https://scanner.tradingview.com/crypto/scan");
    let body: Value =
        serde_json::from_str(requests[0].body.as_deref().expect("body")).expect("json body");
    assert_eq!(body["symbols"]["tickers"], json!(["BINANCE:BTCUSD"]));
    assert_eq!(body["columns"][0], json!("Recommend.Other"));
}

#[tokio::test]
async fn when_scanner_flakes_the_fetcher_retries_through_the_adapter() {
    // Given: A 503, a transport failure, then an answer
    let http = Arc::new(ScriptedHttpClient::new(vec![
        Ok(HttpResponse::with_status(503, "busy")),
        Err(HttpError::new("connection reset")),
        Ok(HttpResponse::ok_json(scan_body(&[("RSI", json!(41.0))]))),
    ]));
    let clock = Arc::new(ManualClock::new());
    let adapter = Arc::new(TradingViewAdapter::new(http.clone(), TIMEOUT));
    let fetcher = default_fetcher(adapter, clock.clone());

    // When
    let snapshot = fetcher
        .fetch_indicators(&Query::parse("EURUSD").expect("valid"))
        .await
        .expect("third attempt succeeds");

    // Then
    assert_eq!(snapshot.get("RSI"), Some(41.0));
    assert_eq!(http.requests().len(), 3);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
}

#[tokio::test]
async fn when_scanner_never_finds_the_symbol_the_error_is_upstream() {
    // Given
    let empty = || -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::ok_json(r#"{"totalCount":0,"data":[]}"#))
    };
    let http = Arc::new(ScriptedHttpClient::new(vec![empty(), empty(), empty()]));
    let clock = Arc::new(ManualClock::new());
    let adapter = Arc::new(TradingViewAdapter::new(http.clone(), TIMEOUT));
    let service = service(adapter, None, clock);

    // When
    let result = service
        .single_timeframe(&Query::parse("QQQQQQ").expect("valid"))
        .await;

    // Then
    assert_eq!(
        result.map(|_| ()),
        Err(FeedError::upstream("Exchange or symbol not found."))
    );
    assert_eq!(http.requests().len(), 3);
}

// =============================================================================
// Yahoo through the service
// =============================================================================

#[tokio::test]
async fn when_chart_and_scanner_answer_historical_levels_are_computed() {
    // Given: Ten climbing hourly candles and a scanner row
    let chart_http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        chart_body(10),
    ))]));
    let scan_http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
        scan_body(&[("RSI", json!(66.0)), ("ATR", json!(0.004))]),
    ))]));
    let clock = Arc::new(ManualClock::new());
    let indicators = Arc::new(TradingViewAdapter::new(scan_http, TIMEOUT));
    let candles: Arc<dyn CandleSource> =
        Arc::new(YahooAdapter::new(chart_http.clone(), TIMEOUT));
    let service = service(indicators, Some(candles), clock);

    // When
    let report = service
        .historical_with_levels(&Query::parse("EURUSD").expect("valid"))
        .await
        .expect("report");

    // Then: The last close sits at the top of the period minus half a wick
    assert_eq!(report.ticker, "EURUSD=X");
    assert_eq!(report.candle_count, 10);
    let levels = report.levels.expect("ten candles are enough");
    assert!((levels.period_high - 1.195).abs() < 1e-9);
    assert!((levels.period_low - 1.095).abs() < 1e-9);
    assert!((levels.current_position_in_range - 95.0).abs() < 1e-6);
    assert_eq!(report.current_indicators.rsi, 66.0);
    assert_eq!(report.current_indicators.atr, 0.004);

    // And: The chart was requested with the hourly interval and day period
    let url = &chart_http.requests()[0].url;
    assert!(url.contains("EURUSD%3DX"), "{url}");
    assert!(url.ends_with("?range=7d&interval=60m"), "{url}");
}

#[tokio::test]
async fn when_chart_returns_404_historical_is_not_found() {
    // Given
    let chart_http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::with_status(
        404, "",
    ))]));
    let scan_http = Arc::new(ScriptedHttpClient::default());
    let clock = Arc::new(ManualClock::new());
    let indicators = Arc::new(TradingViewAdapter::new(scan_http.clone(), TIMEOUT));
    let candles: Arc<dyn CandleSource> = Arc::new(YahooAdapter::new(chart_http, TIMEOUT));
    let service = service(indicators, Some(candles), clock);

    // When
    let result = service
        .historical_with_levels(&Query::parse("ZZZZZZ").expect("valid"))
        .await;

    // Then: The scanner is never consulted
    assert!(matches!(result, Err(FeedError::NotFound { .. })));
    assert!(scan_http.requests().is_empty());
}

#[tokio::test]
async fn when_chart_rejects_the_interval_range_pair_historical_is_not_found() {
    // Given: Minute bars over 30 days, which the chart API answers with 422
    let body = json!({
        "chart": {
            "result": null,
            "error": {
                "code": "Unprocessable Entity",
                "description": "1m data not available for the requested range"
            }
        }
    })
    .to_string();
    let chart_http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::with_status(
        422, body,
    ))]));
    let scan_http = Arc::new(ScriptedHttpClient::default());
    let clock = Arc::new(ManualClock::new());
    let indicators = Arc::new(TradingViewAdapter::new(scan_http.clone(), TIMEOUT));
    let candles: Arc<dyn CandleSource> =
        Arc::new(YahooAdapter::new(chart_http.clone(), TIMEOUT));
    let service = service(indicators, Some(candles), clock);
    let query = Query::parse("EURUSD")
        .expect("valid")
        .with_timeframe_code("1m")
        .with_lookback_days(30)
        .expect("positive");

    // When
    let result = service.historical_with_levels(&query).await;

    // Then: Distinct from an upstream failure, scanner untouched
    assert!(matches!(result, Err(FeedError::NotFound { .. })), "{result:?}");
    assert!(scan_http.requests().is_empty());
    let url = &chart_http.requests()[0].url;
    assert!(url.ends_with("?range=30d&interval=1m"), "{url}");
}

#[tokio::test]
async fn when_chart_is_rate_limited_historical_fails_upstream() {
    // Given
    let chart_http = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::with_status(
        429, "",
    ))]));
    let clock = Arc::new(ManualClock::new());
    let indicators = Arc::new(TradingViewAdapter::new(
        Arc::new(ScriptedHttpClient::default()),
        TIMEOUT,
    ));
    let candles: Arc<dyn CandleSource> = Arc::new(YahooAdapter::new(chart_http, TIMEOUT));
    let service = service(indicators, Some(candles), clock);

    // When
    let result = service
        .historical_with_levels(&Query::parse("EURUSD").expect("valid"))
        .await;

    // Then
    assert!(matches!(result, Err(FeedError::Upstream { .. })));
}
