//! Terminal task results

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::session::SessionState;

/// Terminal outcome of a polling session
///
/// A session produces exactly one of these. Cancellation and submission
/// failures are reported as errors, not results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskResult {
    /// The remote finished the work
    Completed {
        payload: serde_json::Value,
        duration: Duration,
    },

    /// The remote explicitly rejected or failed the work
    Failed { reason: String },

    /// The attempt budget ran out before the remote reached a terminal status;
    /// the work may still finish later
    TimedOut { attempts_made: u32 },

    /// The remote authoritatively reported the task unknown
    NotFound,
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Completed { .. })
    }

    /// Session state matching this result
    pub fn state(&self) -> SessionState {
        match self {
            TaskResult::Completed { .. } => SessionState::Completed,
            TaskResult::Failed { .. } => SessionState::Failed,
            TaskResult::TimedOut { .. } => SessionState::TimedOut,
            TaskResult::NotFound => SessionState::NotFound,
        }
    }

    /// Short machine-friendly label
    pub fn label(&self) -> &'static str {
        match self {
            TaskResult::Completed { .. } => "completed",
            TaskResult::Failed { .. } => "failed",
            TaskResult::TimedOut { .. } => "timed_out",
            TaskResult::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for TaskResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskResult::Completed { duration, .. } => {
                write!(f, "completed in {:.1}s", duration.as_secs_f64())
            }
            TaskResult::Failed { reason } => write!(f, "failed: {}", reason),
            TaskResult::TimedOut { attempts_made } => {
                write!(f, "timed out after {} attempt(s)", attempts_made)
            }
            TaskResult::NotFound => write!(f, "task not found"),
        }
    }
}
