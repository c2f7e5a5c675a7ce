use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::data_source::{IndicatorRequest, IndicatorSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::ratings;
use crate::{IndicatorSnapshot, ProviderId};

const SCANNER_ENDPOINT: &str = "https://scanner.tradingview.com";

/// Resolution that the scanner addresses without a column suffix.
const DAILY_RESOLUTION: &str = "1D";

/// Columns requested from the scanner, in response order.
pub const COLUMNS: &[&str] = &[
    "Recommend.Other",
    "Recommend.All",
    "Recommend.MA",
    "RSI",
    "RSI[1]",
    "Stoch.K",
    "Stoch.D",
    "Stoch.K[1]",
    "Stoch.D[1]",
    "CCI20",
    "CCI20[1]",
    "ADX",
    "ADX+DI",
    "ADX-DI",
    "ADX+DI[1]",
    "ADX-DI[1]",
    "AO",
    "AO[1]",
    "AO[2]",
    "Mom",
    "Mom[1]",
    "MACD.macd",
    "MACD.signal",
    "Rec.Stoch.RSI",
    "Stoch.RSI.K",
    "Rec.WR",
    "W.R",
    "Rec.BBPower",
    "BBPower",
    "Rec.UO",
    "UO",
    "EMA10",
    "SMA10",
    "EMA20",
    "SMA20",
    "EMA30",
    "SMA30",
    "EMA50",
    "SMA50",
    "EMA100",
    "SMA100",
    "EMA200",
    "SMA200",
    "Rec.Ichimoku",
    "Ichimoku.BLine",
    "Rec.VWMA",
    "VWMA",
    "Rec.HullMA9",
    "HullMA9",
    "ATR",
    "BB.upper",
    "BB.lower",
    "P.SAR",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "change",
];

/// Live-indicator adapter over the TradingView scanner.
#[derive(Clone)]
pub struct TradingViewAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl Default for TradingViewAdapter {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), Duration::from_secs(10))
    }
}

impl TradingViewAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }

    fn scan_url(screener: &str) -> String {
        format!("{SCANNER_ENDPOINT}/{}/scan", urlencoding::encode(screener))
    }

    async fn fetch_snapshot(&self, req: &IndicatorRequest) -> Result<IndicatorSnapshot, SourceError> {
        let ticker = req.ticker();
        let body = scan_body(&ticker, req.interval);
        let request = HttpRequest::post(Self::scan_url(&req.screener))
            .with_json_body(body.to_string())
            .with_timeout(self.timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("tradingview transport error: {}", e.message()))
        })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited("tradingview rate limit exceeded"));
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "tradingview returned status {}",
                response.status
            )));
        }

        let scan: ScanResponse = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::invalid_response(format!("failed to parse scanner response: {e}"))
        })?;

        let Some(row) = scan.data.into_iter().next() else {
            return Err(SourceError::symbol_not_found("Exchange or symbol not found."));
        };

        let values = row_values(&row.d);
        debug!(
            ticker = %row.s,
            interval = req.interval,
            columns = values.len(),
            "scanner row received"
        );

        let ratings = ratings::rate(&values);
        Ok(IndicatorSnapshot::new(values).with_summaries(
            ratings.summary,
            ratings.oscillators,
            ratings.moving_averages,
        ))
    }
}

impl IndicatorSource for TradingViewAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Tradingview
    }

    fn indicators<'a>(
        &'a self,
        req: IndicatorRequest,
    ) -> Pin<Box<dyn Future<Output = Result<IndicatorSnapshot, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.fetch_snapshot(&req).await })
    }
}

/// Column name as addressed at `resolution`.
pub fn column_for(name: &str, resolution: &str) -> String {
    if resolution == DAILY_RESOLUTION {
        name.to_owned()
    } else {
        format!("{name}|{resolution}")
    }
}

fn scan_body(ticker: &str, resolution: &str) -> Value {
    let columns: Vec<String> = COLUMNS
        .iter()
        .map(|name| column_for(name, resolution))
        .collect();

    json!({
        "symbols": {"tickers": [ticker], "query": {"types": []}},
        "columns": columns,
    })
}

/// Pairs the row's values with [`COLUMNS`] by position, dropping nulls and
/// non-numeric cells.
fn row_values(cells: &[Value]) -> BTreeMap<String, f64> {
    COLUMNS
        .iter()
        .zip(cells)
        .filter_map(|(name, cell)| cell.as_f64().map(|v| ((*name).to_owned(), v)))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
struct ScanResponse {
    #[serde(default)]
    data: Vec<ScanRow>,
}

#[derive(Debug, Clone, Deserialize)]
struct ScanRow {
    #[serde(default)]
    s: String,
    #[serde(default)]
    d: Vec<Value>,
}
