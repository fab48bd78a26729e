//! Task Service
//!
//! Business logic for task submission and the simulated work timeline.

use chrono::{DateTime, Utc};
use serde_json::json;
use tether_core::dto::task::{RemoteStatus, StatusResponse};

use crate::config::SimulationConfig;
use crate::repository::{TaskRecord, TaskStore, task_repository};

/// Service error type
#[derive(Debug)]
pub enum TaskError {
    NotFound(String),
    ValidationError(String),
}

/// Payload flag that makes a simulated task fail
const FAIL_FLAG: &str = "fail";

/// Create a new task
pub async fn submit_task(
    store: &TaskStore,
    payload: serde_json::Value,
) -> Result<TaskRecord, TaskError> {
    validate_payload(&payload)?;

    let record = task_repository::create(store, payload).await;

    let tracked = task_repository::count(store).await;
    tracing::info!(
        tracked = tracked,
        "Task created: {}",
        record.id
    );

    Ok(record)
}

/// Get the current status of a task
pub async fn get_status(
    store: &TaskStore,
    simulation: &SimulationConfig,
    id: &str,
) -> Result<StatusResponse, TaskError> {
    let record = task_repository::find_by_id(store, id)
        .await
        .ok_or_else(|| TaskError::NotFound(id.to_string()))?;

    Ok(status_at(&record, simulation, Utc::now()))
}

/// Forget a task
pub async fn delete_task(store: &TaskStore, id: &str) -> Result<(), TaskError> {
    if !task_repository::delete(store, id).await {
        return Err(TaskError::NotFound(id.to_string()));
    }

    let tracked = task_repository::count(store).await;
    tracing::info!(
        tracked = tracked,
        "Task {} deleted",
        id
    );

    Ok(())
}

/// Status of `record` at instant `now`
pub fn status_at(
    record: &TaskRecord,
    simulation: &SimulationConfig,
    now: DateTime<Utc>,
) -> StatusResponse {
    let elapsed = now
        .signed_duration_since(record.submitted_at)
        .to_std()
        .unwrap_or_default();

    if elapsed < simulation.pending_for {
        return StatusResponse::new(&record.id, RemoteStatus::Pending);
    }

    if elapsed < simulation.pending_for + simulation.work_for {
        return StatusResponse::new(&record.id, RemoteStatus::Processing);
    }

    let duration = Some(simulation.work_for.as_secs_f64());

    if wants_failure(&record.payload) {
        return StatusResponse {
            error: Some(json!("Simulated failure requested by payload")),
            duration,
            ..StatusResponse::new(&record.id, RemoteStatus::Failed)
        };
    }

    StatusResponse {
        result: Some(json!({ "echo": record.payload })),
        duration,
        ..StatusResponse::new(&record.id, RemoteStatus::Completed)
    }
}

fn wants_failure(payload: &serde_json::Value) -> bool {
    payload.get(FAIL_FLAG).and_then(|v| v.as_bool()).unwrap_or(false)
}

// =============================================================================
// Validation
// =============================================================================

fn validate_payload(payload: &serde_json::Value) -> Result<(), TaskError> {
    let empty = match payload {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    };

    if empty {
        return Err(TaskError::ValidationError(
            "Task payload cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn simulation() -> SimulationConfig {
        SimulationConfig {
            pending_for: Duration::from_secs(1),
            work_for: Duration::from_secs(4),
        }
    }

    fn record(payload: serde_json::Value) -> TaskRecord {
        TaskRecord {
            id: "T1".to_string(),
            payload,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_timeline() {
        let record = record(json!({"topic": "rust"}));
        let at = |ms: i64| record.submitted_at + chrono::Duration::milliseconds(ms);

        assert_eq!(status_at(&record, &simulation(), at(0)).status, RemoteStatus::Pending);
        assert_eq!(status_at(&record, &simulation(), at(999)).status, RemoteStatus::Pending);
        assert_eq!(
            status_at(&record, &simulation(), at(1000)).status,
            RemoteStatus::Processing
        );

        let done = status_at(&record, &simulation(), at(5000));
        assert_eq!(done.status, RemoteStatus::Completed);
        assert_eq!(done.result, Some(json!({"echo": {"topic": "rust"}})));
        assert_eq!(done.duration, Some(4.0));
    }

    #[test]
    fn test_failure_flag() {
        let record = record(json!({"topic": "rust", "fail": true}));
        let later = record.submitted_at + chrono::Duration::seconds(10);

        let status = status_at(&record, &simulation(), later);
        assert_eq!(status.status, RemoteStatus::Failed);
        assert!(status.error_message().unwrap().contains("Simulated failure"));
    }

    #[test]
    fn test_validate_payload() {
        assert!(validate_payload(&json!({"topic": "rust"})).is_ok());
        assert!(validate_payload(&json!([1, 2])).is_ok());
        assert!(validate_payload(&json!(null)).is_err());
        assert!(validate_payload(&json!({})).is_err());
        assert!(validate_payload(&json!("  ")).is_err());
    }

    #[tokio::test]
    async fn test_submit_and_delete_track_store_size() {
        let store = TaskStore::new();

        let record = submit_task(&store, json!({"topic": "rust"})).await.unwrap();
        assert!(submit_task(&store, json!({})).await.is_err());
        assert_eq!(task_repository::count(&store).await, 1);

        delete_task(&store, &record.id).await.unwrap();
        assert_eq!(task_repository::count(&store).await, 0);
        assert!(matches!(
            delete_task(&store, &record.id).await,
            Err(TaskError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_found() {
        let store = TaskStore::new();
        let err = get_status(&store, &simulation(), "missing").await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(id) if id == "missing"));
    }
}
