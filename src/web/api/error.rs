use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::constellation::{ConstellationError, FailureKind, SatelliteFailure};

pub enum ApiError {
    NotFound(String),
    Render(SatelliteFailure),
    Constellation(ConstellationError),
    Internal(String),
}

impl From<SatelliteFailure> for ApiError {
    fn from(e: SatelliteFailure) -> Self {
        ApiError::Render(e)
    }
}

impl From<ConstellationError> for ApiError {
    fn from(e: ConstellationError) -> Self {
        ApiError::Constellation(e)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(name) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::with_message("satellite_not_found", &name)),
            )
                .into_response(),
            ApiError::Render(failure) => {
                let kind = failure.kind();
                let status = match kind {
                    FailureKind::Lookup => StatusCode::NOT_FOUND,
                    FailureKind::WorkerTimeout => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    Json(ErrorResponse::with_message(
                        &kind.to_string(),
                        &failure.to_string(),
                    )),
                )
                    .into_response()
            }
            ApiError::Constellation(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("render_failed", &e.to_string())),
            )
                .into_response(),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("internal_error", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
