//! Error types for the runner

use tether_client::ClientError;
use tether_core::domain::session::TransitionError;
use thiserror::Error;

/// Errors surfaced by `Orchestrator::run`
///
/// Per-attempt transport failures and malformed replies never appear here:
/// the session absorbs them into its attempt budget. Terminal remote outcomes
/// (`Failed`, `TimedOut`, `NotFound`) are `TaskResult`s, not errors.
#[derive(Debug, Error)]
pub enum RunError {
    /// The "start work" call failed; never retried by the runner
    #[error("Submission failed: {0}")]
    SubmissionFailed(#[source] ClientError),

    /// Another session is active on this orchestrator
    #[error("A task is already running on this orchestrator")]
    AlreadyRunning,

    /// The caller (or process shutdown) stopped the session
    #[error("Session cancelled")]
    Cancelled,

    #[error("Invalid polling policy: {0}")]
    InvalidPolicy(String),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// The session task panicked or was aborted
    #[error("Session task aborted: {0}")]
    Aborted(String),
}

impl RunError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
