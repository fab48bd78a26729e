//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tether_core::dto::task::{RemoteStatus, StatusResponse};

use crate::service::task_service::TaskError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unknown task; answered with a `not_found` status body
    TaskNotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::TaskNotFound(id) => {
                tracing::debug!("Task not found: {}", id);
                (
                    StatusCode::NOT_FOUND,
                    Json(StatusResponse::new(id, RemoteStatus::NotFound)),
                )
                    .into_response()
            }
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(id) => ApiError::TaskNotFound(id),
            TaskError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
