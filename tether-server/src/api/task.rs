//! Task API Handlers
//!
//! HTTP endpoints for task submission and status checks.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tether_core::dto::task::{RemoteStatus, StatusResponse, SubmitResponse};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::task_service;

/// POST /tasks
/// Accept work and return immediately with a status URL
pub async fn submit_task(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let record = task_service::submit_task(&state.store, payload).await?;

    let response = SubmitResponse {
        status_url: Some(format!("/tasks/{}", record.id)),
        task_id: record.id,
        status: Some(RemoteStatus::Pending),
    };

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// GET /tasks/{id}
/// Report task status
pub async fn get_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    tracing::debug!("Checking task: {}", id);

    let status = task_service::get_status(&state.store, &state.simulation, &id).await?;

    Ok(Json(status))
}

/// DELETE /tasks/{id}
/// Forget a task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    task_service::delete_task(&state.store, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
