use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chartfeed_core::{Envelope, FeedError, ValidationError};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    /// The body could not be read as a request document.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Feed(e) => match e {
                FeedError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                FeedError::NotFound { .. } => StatusCode::NOT_FOUND,
                FeedError::UnsupportedFeature { .. } => StatusCode::NOT_IMPLEMENTED,
                FeedError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Feed(FeedError::Validation(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "request rejected");
        }
        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_errors_map_to_distinct_statuses() {
        let cases = [
            (FeedError::upstream("boom"), StatusCode::INTERNAL_SERVER_ERROR),
            (FeedError::not_found("none"), StatusCode::NOT_FOUND),
            (
                FeedError::UnsupportedFeature {
                    feature: "historical data",
                },
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                FeedError::Validation(ValidationError::EmptySymbol),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).status(), expected);
        }
    }
}
