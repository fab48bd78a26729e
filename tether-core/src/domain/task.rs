//! Task domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::policy::PollPolicy;

/// Placeholder substituted with the task identifier in status templates
pub const TASK_ID_PLACEHOLDER: &str = "{taskId}";

/// One unit of remote work and the endpoints used to drive it
///
/// Created by the caller and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Endpoint receiving the `POST` that starts the work
    pub submit_url: String,

    /// JSON body of the submission; validated by the caller
    pub payload: serde_json::Value,

    /// Status endpoint template containing `{taskId}`, used when the
    /// submission response carries no literal status URL
    pub status_template: Option<String>,

    /// Timing and budget for the polling session
    pub policy: PollPolicy,
}

impl TaskDescriptor {
    /// Creates a descriptor without a status template
    pub fn new(submit_url: impl Into<String>, payload: serde_json::Value, policy: PollPolicy) -> Self {
        Self {
            submit_url: submit_url.into(),
            payload,
            status_template: None,
            policy,
        }
    }

    /// Sets the status endpoint template
    pub fn with_status_template(mut self, template: impl Into<String>) -> Self {
        self.status_template = Some(template.into());
        self
    }
}

/// Substitutes a task identifier into a status template
pub fn expand_status_template(template: &str, task_id: &str) -> String {
    template.replace(TASK_ID_PLACEHOLDER, task_id)
}

/// A successfully submitted task
///
/// Created once per submission, owned by the polling session and discarded
/// when the session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    /// Opaque identifier assigned by the remote
    pub task_id: String,

    /// Fully resolved status endpoint
    pub status_url: String,

    /// When the submission succeeded
    pub created_at: DateTime<Utc>,
}

impl TaskHandle {
    pub fn new(task_id: impl Into<String>, status_url: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            status_url: status_url.into(),
            created_at: Utc::now(),
        }
    }
}
