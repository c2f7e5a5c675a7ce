use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::data_source::{CandleRequest, CandleSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{Candle, ProviderId, UtcDateTime};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Historical OHLCV adapter over the Yahoo Finance chart API.
///
/// The chart endpoint needs no cookie/crumb handshake, so every request is a
/// single unauthenticated GET.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), Duration::from_secs(10))
    }
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }

    fn chart_url(req: &CandleRequest) -> String {
        format!(
            "{CHART_ENDPOINT}/{}?range={}&interval={}",
            urlencoding::encode(&req.ticker),
            urlencoding::encode(&req.period),
            req.interval
        )
    }

    async fn fetch_candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, SourceError> {
        let request = HttpRequest::get(Self::chart_url(req))
            .with_header("accept", "application/json")
            .with_timeout(self.timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited("yahoo rate limit exceeded"));
        }
        // Unknown tickers (404) and unsupported interval/range pairs (422)
        // come back as client errors with a chart.error body.
        if (400..500).contains(&response.status) {
            let reported = serde_json::from_str::<YahooChartResponse>(&response.body)
                .ok()
                .and_then(|parsed| parsed.chart.error);
            if let Some(error) = reported {
                log_chart_error(&req.ticker, &error);
                return Ok(Vec::new());
            }
            if response.status == 404 {
                debug!(ticker = %req.ticker, "yahoo has no chart for ticker");
                return Ok(Vec::new());
            }
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        let chart_response: YahooChartResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::invalid_response(format!("failed to parse yahoo chart: {e}")))?;

        if let Some(error) = &chart_response.chart.error {
            log_chart_error(&req.ticker, error);
            return Ok(Vec::new());
        }

        let Some(result) = chart_response.chart.result.into_iter().flatten().next() else {
            return Ok(Vec::new());
        };

        parse_chart(result)
    }
}

fn log_chart_error(ticker: &str, error: &YahooChartError) {
    debug!(
        ticker,
        code = %error.code,
        description = %error.description,
        "yahoo chart reported no data"
    );
}

impl CandleSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn candles<'a>(
        &'a self,
        req: CandleRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Candle>, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_candles(&req).await })
    }
}

/// Zips the timestamp column with the quote columns.
///
/// Rows with a missing OHLC value (market holidays, the still-forming bar)
/// are skipped; a missing volume reads as zero.
fn parse_chart(result: YahooChartResult) -> Result<Vec<Candle>, SourceError> {
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut candles = Vec::with_capacity(timestamps.len());
    for (i, &ts_value) in timestamps.iter().enumerate() {
        let ts = UtcDateTime::from_unix_seconds(ts_value)
            .map_err(|e| SourceError::invalid_response(format!("invalid timestamp: {e}")))?;

        if let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) {
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
            match Candle::new(ts, *open, *high, *low, *close, volume) {
                Ok(candle) => candles.push(candle),
                Err(e) => debug!(row = i, error = %e, "skipping inconsistent yahoo candle"),
            }
        } else {
            debug!(row = i, "skipping yahoo row with missing OHLC value");
        }
    }

    Ok(candles)
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}
