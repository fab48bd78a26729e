//! Task DTOs for the submission and status endpoints

use serde::{Deserialize, Serialize};

/// Status reported by a remote task endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    NotFound,
}

/// Response body of a successful submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub task_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RemoteStatus>,

    /// Literal status endpoint, absolute or relative to the submission URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_url: Option<String>,
}

/// Response body of a status check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    pub status: RemoteStatus,

    /// Work product, present once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    /// Failure description: a string or an object with a `message` field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,

    /// Remote-measured processing time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl StatusResponse {
    /// Creates a bare response with only a status
    pub fn new(task_id: impl Into<String>, status: RemoteStatus) -> Self {
        Self {
            task_id: Some(task_id.into()),
            status,
            result: None,
            error: None,
            duration: None,
        }
    }

    /// Extracts a human-readable failure reason, if any
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::String(_) => None,
            serde_json::Value::Object(map) => map
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
