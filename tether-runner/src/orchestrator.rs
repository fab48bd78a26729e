//! Orchestrator
//!
//! Public entry point. Accepts a task descriptor, enforces at most one
//! in-flight session per instance, and runs the session on its own tokio
//! task so callers get a handle back immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tether_client::TaskClient;
use tether_core::domain::result::TaskResult;
use tether_core::domain::session::SessionSnapshot;
use tether_core::domain::task::TaskDescriptor;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::RunError;
use crate::repository::{HttpTaskRepository, TaskRepository};
use crate::session::PollingSession;

/// Coordinator for one task type
///
/// Independent orchestrators (e.g. one per task type) never block each other;
/// the single-in-flight guard is per instance.
pub struct Orchestrator {
    repository: Arc<dyn TaskRepository>,
    in_flight: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl Orchestrator {
    /// Creates an orchestrator over the given repository
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self {
            repository,
            in_flight: Arc::new(AtomicBool::new(false)),
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates an orchestrator talking HTTP with a default client
    pub fn http() -> Self {
        Self::new(Arc::new(HttpTaskRepository::new(TaskClient::new())))
    }

    /// Ties every session started by this orchestrator to `shutdown`
    ///
    /// Cancelling the token cancels the active session; it does not prevent
    /// later sessions from being started with an already-cancelled token.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Whether a session is currently active
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Starts a session and returns immediately
    ///
    /// Fails fast with `AlreadyRunning` (without any network call) while
    /// another session is active. Must be called from within a tokio runtime.
    pub fn start(&self, descriptor: TaskDescriptor) -> Result<SessionHandle, RunError> {
        descriptor
            .policy
            .validate()
            .map_err(RunError::InvalidPolicy)?;

        let guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!(url = %descriptor.submit_url, "Rejecting task, another session is in flight");
            RunError::AlreadyRunning
        })?;

        info!(
            url = %descriptor.submit_url,
            max_attempts = descriptor.policy.max_attempts,
            "Starting task session (budget {:?})",
            descriptor.policy.session_budget()
        );

        let cancel = self.shutdown.child_token();
        let (session, progress) =
            PollingSession::new(descriptor, Arc::clone(&self.repository), cancel.clone());

        let join = tokio::spawn(async move {
            let result = session.run().await;
            drop(guard);
            result
        });

        Ok(SessionHandle {
            cancel,
            progress,
            join,
        })
    }

    /// Runs a task to its terminal outcome
    ///
    /// Dropping the returned future does not stop the session; use `start`
    /// and `SessionHandle::cancel` for that.
    pub async fn run(&self, descriptor: TaskDescriptor) -> Result<TaskResult, RunError> {
        self.start(descriptor)?.wait().await
    }
}

/// Caller's view of a running session
pub struct SessionHandle {
    cancel: CancellationToken,
    progress: watch::Receiver<SessionSnapshot>,
    join: JoinHandle<Result<TaskResult, RunError>>,
}

impl SessionHandle {
    /// Requests cooperative cancellation
    ///
    /// The session stops at its next suspension point; a status call already
    /// in flight finishes but its reply is discarded.
    pub fn cancel(&self) {
        debug!("Cancellation requested");
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receiver notified on every state change
    pub fn progress(&self) -> watch::Receiver<SessionSnapshot> {
        self.progress.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.progress.borrow().clone()
    }

    /// Waits for the terminal outcome
    pub async fn wait(self) -> Result<TaskResult, RunError> {
        self.join
            .await
            .map_err(|e| RunError::Aborted(e.to_string()))?
    }
}

/// Holds the single-in-flight flag; releases it on drop
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
