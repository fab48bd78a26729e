//! Polling session
//!
//! Submits one task, waits the initial delay, then checks its status every
//! poll interval until the interpreter reports a terminal result, the attempt
//! budget runs out, or the session is cancelled.
//!
//! Poll attempts are strictly sequential: a new status call is never issued
//! while the previous one is outstanding. The only suspension points are the
//! initial delay, the inter-poll sleeps and the network calls themselves.

use std::sync::Arc;
use tether_client::ClientError;
use tether_core::domain::attempt::{AttemptOutcome, PollAttempt};
use tether_core::domain::result::TaskResult;
use tether_core::domain::session::{SessionSnapshot, SessionState};
use tether_core::domain::task::{TaskDescriptor, TaskHandle};
use tokio::sync::watch;
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::RunError;
use crate::interpreter::{PollContext, StatusInterpreter, Verdict};
use crate::repository::TaskRepository;

/// One task tracked from submission to terminal outcome
pub struct PollingSession {
    descriptor: TaskDescriptor,
    repository: Arc<dyn TaskRepository>,
    cancel: CancellationToken,
    progress: watch::Sender<SessionSnapshot>,
    interpreter: StatusInterpreter,
    state: SessionState,
    attempts_made: u32,
}

impl PollingSession {
    /// Creates an idle session
    ///
    /// Returns the session together with a receiver that observes every
    /// state change.
    pub fn new(
        descriptor: TaskDescriptor,
        repository: Arc<dyn TaskRepository>,
        cancel: CancellationToken,
    ) -> (Self, watch::Receiver<SessionSnapshot>) {
        let (progress, receiver) = watch::channel(SessionSnapshot::default());
        let interpreter = StatusInterpreter::new(&descriptor.policy);

        let session = Self {
            descriptor,
            repository,
            cancel,
            progress,
            interpreter,
            state: SessionState::Idle,
            attempts_made: 0,
        };

        (session, receiver)
    }

    /// Drives the session to its single terminal outcome
    pub async fn run(mut self) -> Result<TaskResult, RunError> {
        self.transition(SessionState::Submitting)?;

        if self.cancel.is_cancelled() {
            return self.cancelled();
        }

        let handle = match self.submit().await {
            Ok(handle) => handle,
            Err(e) => {
                error!(url = %self.descriptor.submit_url, "Task submission failed: {}", e);
                self.transition(SessionState::Failed)?;
                return Err(RunError::SubmissionFailed(e));
            }
        };
        let submitted_at = Instant::now();

        // The remote work is already committed at this point; only our
        // interest in it is dropped.
        if self.cancel.is_cancelled() {
            warn!(task_id = %handle.task_id, "Cancelled during submission, remote task left running");
            return self.cancelled();
        }

        info!(
            task_id = %handle.task_id,
            status_url = %handle.status_url,
            "Task submitted, awaiting initial delay of {:?}",
            self.descriptor.policy.initial_delay
        );

        self.progress
            .send_modify(|snapshot| snapshot.task_id = Some(handle.task_id.clone()));
        self.transition(SessionState::AwaitingInitialDelay)?;

        if !self.sleep(self.descriptor.policy.initial_delay).await {
            return self.cancelled();
        }

        self.transition(SessionState::Polling)?;
        self.poll_until_terminal(&handle, submitted_at).await
    }

    async fn submit(&self) -> Result<TaskHandle, ClientError> {
        let timeout = self.descriptor.policy.per_call_timeout;

        match time::timeout(timeout, self.repository.submit(&self.descriptor)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout),
        }
    }

    async fn poll_until_terminal(
        &mut self,
        handle: &TaskHandle,
        submitted_at: Instant,
    ) -> Result<TaskResult, RunError> {
        let policy = self.descriptor.policy;
        let mut consecutive_transport_errors = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return self.cancelled();
            }

            let attempt = self.poll_once(handle).await;
            self.attempts_made = attempt.sequence;

            // An in-flight call is allowed to finish, its reply is dropped
            if self.cancel.is_cancelled() {
                debug!(
                    task_id = %handle.task_id,
                    attempt = attempt.sequence,
                    "Discarding reply received after cancellation"
                );
                return self.cancelled();
            }

            let verdict = match attempt.outcome {
                AttemptOutcome::TransportError(message) => {
                    consecutive_transport_errors += 1;
                    warn!(
                        task_id = %handle.task_id,
                        attempt = attempt.sequence,
                        max_attempts = policy.max_attempts,
                        consecutive = consecutive_transport_errors,
                        "Status check failed: {}",
                        message
                    );
                    Verdict::Continue
                }
                AttemptOutcome::Reply(reply) => {
                    consecutive_transport_errors = 0;
                    let ctx = PollContext {
                        attempt: attempt.sequence,
                        elapsed: submitted_at.elapsed(),
                    };
                    self.interpreter.evaluate(ctx, reply)
                }
            };

            match verdict {
                Verdict::Terminal(result) => {
                    self.transition(result.state())?;
                    info!(
                        task_id = %handle.task_id,
                        attempts = self.attempts_made,
                        "Task finished: {}",
                        result
                    );
                    return Ok(result);
                }
                Verdict::Continue if self.attempts_made >= policy.max_attempts => {
                    self.transition(SessionState::TimedOut)?;
                    warn!(
                        task_id = %handle.task_id,
                        attempts = self.attempts_made,
                        "Attempt budget exhausted before the task finished"
                    );
                    return Ok(TaskResult::TimedOut {
                        attempts_made: self.attempts_made,
                    });
                }
                Verdict::Continue => {
                    self.transition(SessionState::Polling)?;

                    if !self.sleep(policy.poll_interval).await {
                        return self.cancelled();
                    }
                }
            }
        }
    }

    /// Issues one status call bounded by the per-call timeout
    async fn poll_once(&self, handle: &TaskHandle) -> PollAttempt {
        let sequence = self.attempts_made + 1;
        let timeout = self.descriptor.policy.per_call_timeout;

        debug!(task_id = %handle.task_id, attempt = sequence, "Checking task status");

        let call = self.repository.fetch_status(handle, timeout);
        let outcome = match time::timeout(timeout, call).await {
            Ok(Ok(reply)) => AttemptOutcome::Reply(reply),
            Ok(Err(e)) => AttemptOutcome::TransportError(e.to_string()),
            Err(_) => AttemptOutcome::TransportError(ClientError::Timeout.to_string()),
        };

        PollAttempt::new(sequence, outcome)
    }

    /// Sleeps unless cancelled first; returns false on cancellation
    async fn sleep(&self, duration: Duration) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = time::sleep(duration) => true,
        }
    }

    fn cancelled(&mut self) -> Result<TaskResult, RunError> {
        self.transition(SessionState::Cancelled)?;
        info!(attempts = self.attempts_made, "Session cancelled");
        Err(RunError::Cancelled)
    }

    fn transition(&mut self, next: SessionState) -> Result<(), RunError> {
        self.state = self.state.advance(next)?;

        let attempts_made = self.attempts_made;
        self.progress.send_modify(|snapshot| {
            snapshot.state = next;
            snapshot.attempts_made = attempts_made;
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::{MockRepository, Step, completed, status};
    use serde_json::json;
    use tether_core::domain::attempt::StatusReply;
    use tether_core::domain::policy::PollPolicy;

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_secs(5),
            poll_interval: Duration::from_secs(2),
            max_attempts,
            per_call_timeout: Duration::from_secs(10),
            not_found_grace: 1,
            malformed_tolerance: 2,
        }
    }

    fn session(
        repo: Arc<MockRepository>,
        policy: PollPolicy,
    ) -> (PollingSession, watch::Receiver<SessionSnapshot>, CancellationToken) {
        let descriptor = TaskDescriptor::new("http://mock/start", json!({"topic": "rust"}), policy);
        let cancel = CancellationToken::new();
        let (session, progress) = PollingSession::new(descriptor, repo, cancel.clone());
        (session, progress, cancel)
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_after_two_processing_replies() {
        let repo = MockRepository::new([
            status("processing"),
            status("processing"),
            completed(json!({"x": 1})),
        ]);
        let (session, progress, _cancel) = session(repo.clone(), policy(5));

        let result = session.run().await.unwrap();

        assert_eq!(
            result,
            TaskResult::Completed {
                payload: json!({"x": 1}),
                duration: Duration::from_millis(1500),
            }
        );
        assert_eq!(repo.status_calls(), 3);

        let snapshot = progress.borrow().clone();
        assert_eq!(snapshot.state, SessionState::Completed);
        assert_eq!(snapshot.task_id.as_deref(), Some("T1"));
        assert_eq!(snapshot.attempts_made, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_exactly_max_attempts() {
        let repo = MockRepository::new([]);
        let (session, progress, _cancel) = session(repo.clone(), policy(5));
        let started = Instant::now();

        let result = session.run().await.unwrap();

        assert_eq!(result, TaskResult::TimedOut { attempts_made: 5 });
        assert_eq!(repo.status_calls(), 5);
        assert_eq!(progress.borrow().state, SessionState::TimedOut);

        // initial delay + 4 inter-poll sleeps; no sleep after the last attempt
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(5 + 4 * 2));
        assert!(elapsed < Duration::from_secs(5 + 5 * 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_after_grace_period() {
        let repo = MockRepository::new([
            Step::Reply(StatusReply::Missing),
            status("not_found"),
            status("processing"),
        ]);
        let (session, _progress, _cancel) = session(repo.clone(), policy(5));

        let result = session.run().await.unwrap();

        assert_eq!(result, TaskResult::NotFound);
        assert_eq!(repo.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_transport_errors_are_absorbed() {
        let repo = MockRepository::new([
            Step::Transport,
            Step::Transport,
            Step::Transport,
            status("processing"),
            completed(json!("done")),
        ]);
        let (session, _progress, _cancel) = session(repo.clone(), policy(5));

        let result = session.run().await.unwrap();

        assert!(result.is_success());
        assert_eq!(repo.status_calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_errors_exhaust_budget() {
        let repo = MockRepository::new([Step::Transport, Step::Transport, Step::Transport]);
        let (session, _progress, _cancel) = session(repo.clone(), policy(3));

        let result = session.run().await.unwrap();

        assert_eq!(result, TaskResult::TimedOut { attempts_made: 3 });
        assert_eq!(repo.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_counts_as_failed_attempt() {
        let repo = MockRepository::new([
            Step::Slow(
                Duration::from_secs(60),
                StatusReply::Body(json!({"taskId": "T1", "status": "completed"})),
            ),
            completed(json!({"x": 2})),
        ]);
        let (session, _progress, _cancel) = session(repo.clone(), policy(5));

        let result = session.run().await.unwrap();

        assert!(matches!(result, TaskResult::Completed { payload, .. } if payload == json!({"x": 2})));
        assert_eq!(repo.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_malformed_replies_fail() {
        let repo = MockRepository::new([
            Step::Reply(StatusReply::Unreadable("<html>".to_string())),
            Step::Reply(StatusReply::Body(json!({"state": "?"}))),
            Step::Reply(StatusReply::Body(json!({"status": 42}))),
        ]);
        let (session, _progress, _cancel) = session(repo.clone(), policy(10));

        let result = session.run().await.unwrap();

        assert_eq!(
            result,
            TaskResult::Failed {
                reason: "malformed response".to_string()
            }
        );
        assert_eq!(repo.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_is_terminal() {
        let repo = MockRepository::new([Step::Reply(StatusReply::Body(
            json!({"taskId": "T1", "status": "failed", "error": {"message": "no subjects"}}),
        ))]);
        let (session, _progress, _cancel) = session(repo.clone(), policy(5));

        let result = session.run().await.unwrap();

        assert_eq!(
            result,
            TaskResult::Failed {
                reason: "no subjects".to_string()
            }
        );
        assert_eq!(repo.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_failure_is_not_retried() {
        let repo = MockRepository::failing_submit();
        let (session, progress, _cancel) = session(repo.clone(), policy(5));

        let err = session.run().await.unwrap_err();

        assert!(matches!(err, RunError::SubmissionFailed(ClientError::ApiError { status: 503, .. })));
        assert_eq!(repo.submit_calls(), 1);
        assert_eq!(repo.status_calls(), 0);
        assert_eq!(progress.borrow().state, SessionState::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start_skips_submission() {
        let repo = MockRepository::new([]);
        let (session, progress, cancel) = session(repo.clone(), policy(5));
        cancel.cancel();

        let err = session.run().await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(repo.submit_calls(), 0);
        assert_eq!(progress.borrow().state, SessionState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_initial_delay() {
        let repo = MockRepository::new([]);
        let (session, mut progress, cancel) = session(repo.clone(), policy(5));
        let task = tokio::spawn(session.run());

        progress
            .wait_for(|s| s.state == SessionState::AwaitingInitialDelay)
            .await
            .unwrap();
        let cancelled_at = Instant::now();
        cancel.cancel();

        let err = task.await.unwrap().unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(repo.status_calls(), 0);
        assert!(cancelled_at.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_between_polls() {
        let repo = MockRepository::new([]);
        let (session, mut progress, cancel) = session(repo.clone(), policy(10));
        let task = tokio::spawn(session.run());

        progress.wait_for(|s| s.attempts_made == 2).await.unwrap();
        cancel.cancel();

        let err = task.await.unwrap().unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(repo.status_calls(), 2);
        assert_eq!(progress.borrow().state, SessionState::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arriving_after_cancel_is_discarded() {
        let repo = MockRepository::new([Step::Slow(
            Duration::from_secs(3),
            StatusReply::Body(json!({"status": "completed", "result": 1})),
        )]);
        let (session, _progress, cancel) = session(repo.clone(), policy(5));
        let task = tokio::spawn(session.run());

        // Initial delay is 5s; the first call is in flight until 8s
        time::sleep(Duration::from_secs(6)).await;
        cancel.cancel();

        let err = task.await.unwrap().unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(repo.status_calls(), 1);
    }
}
