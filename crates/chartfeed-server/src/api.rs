use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chartfeed_core::{Envelope, HistoricalReport, MultiTimeframeReport, Query, TimeframeReport};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info_span, Instrument, Span};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{ServiceStatus, SymbolRequest};

const REQUEST_ID_HEADER: &str = "x-request-id";

async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus::running())
}

/// Single-timeframe indicator report.
async fn get_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SymbolRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<TimeframeReport>>> {
    let query = parse_query(payload)?;
    let report = state
        .service
        .single_timeframe(&query)
        .instrument(request_span("get_data", &headers, &query))
        .await?;
    Ok(Json(Envelope::success(report)))
}

/// 1h, 15m and 5m reports in one response.
async fn get_multi_timeframe(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SymbolRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<MultiTimeframeReport>>> {
    let query = parse_query(payload)?;
    let report = state
        .service
        .multi_timeframe(&query)
        .instrument(request_span("get_multi_timeframe", &headers, &query))
        .await?;
    Ok(Json(Envelope::success(report)))
}

/// Candle history with price-action levels.
async fn get_historical(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SymbolRequest>, JsonRejection>,
) -> ApiResult<Json<Envelope<HistoricalReport>>> {
    let query = parse_query(payload)?;
    let report = state
        .service
        .historical_with_levels(&query)
        .instrument(request_span("get_historical", &headers, &query))
        .await?;
    Ok(Json(Envelope::success(report)))
}

fn parse_query(payload: Result<Json<SymbolRequest>, JsonRejection>) -> ApiResult<Query> {
    let Json(request) = payload?;
    Ok(request.into_query()?)
}

fn request_span(route: &'static str, headers: &HeaderMap, query: &Query) -> Span {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    info_span!(
        "request",
        route,
        request_id = %request_id,
        symbol = %query.symbol(),
        timeframe = query.timeframe_code(),
    )
}

/// `TimeoutLayer` answers with a bare 408; give it the failure envelope.
async fn envelope_timeouts(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    ApiError::Rejected {
        status: StatusCode::REQUEST_TIMEOUT,
        message: String::from("request timed out"),
    }
    .into_response()
}

pub fn app_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/get-data", post(get_data))
        .route("/get-multi-timeframe", post(get_multi_timeframe))
        .route("/get-historical", post(get_historical))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(envelope_timeouts))
        .layer(TraceLayer::new_for_http())
}
