//! Status interpreter
//!
//! Maps a status reply onto the session state machine:
//!
//! | Reply                               | Verdict                          |
//! |-------------------------------------|----------------------------------|
//! | `pending` / `processing`            | `Continue`                       |
//! | `completed`                         | `Terminal(Completed)`            |
//! | `failed`                            | `Terminal(Failed)`               |
//! | `not_found` or HTTP 404, in grace   | `Continue`                       |
//! | `not_found` or HTTP 404, after      | `Terminal(NotFound)`             |
//! | malformed, within tolerance         | `Continue` (warning logged)      |
//! | malformed, tolerance exceeded       | `Terminal(Failed("malformed response"))` |

use std::time::Duration;
use tether_core::domain::attempt::StatusReply;
use tether_core::domain::policy::PollPolicy;
use tether_core::domain::result::TaskResult;
use tether_core::dto::task::{RemoteStatus, StatusResponse};
use tracing::{debug, warn};

/// Failure reason used when replies stay unparseable
pub const MALFORMED_RESPONSE: &str = "malformed response";

/// Failure reason used when the remote reports `failed` without details
const DEFAULT_FAILURE: &str = "task failed";

/// Decision for one evaluated reply
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Keep polling
    Continue,
    /// Stop polling with this result
    Terminal(TaskResult),
}

/// Where the session is when a reply is evaluated
#[derive(Debug, Clone, Copy)]
pub struct PollContext {
    /// 1-based number of the attempt that produced the reply
    pub attempt: u32,
    /// Time since the submission succeeded
    pub elapsed: Duration,
}

/// Stateful reply evaluator for one session
#[derive(Debug)]
pub struct StatusInterpreter {
    not_found_grace: u32,
    malformed_tolerance: u32,
    consecutive_malformed: u32,
}

impl StatusInterpreter {
    pub fn new(policy: &PollPolicy) -> Self {
        Self {
            not_found_grace: policy.not_found_grace,
            malformed_tolerance: policy.malformed_tolerance,
            consecutive_malformed: 0,
        }
    }

    /// Evaluates one reply
    pub fn evaluate(&mut self, ctx: PollContext, reply: StatusReply) -> Verdict {
        match reply {
            StatusReply::Missing => {
                self.consecutive_malformed = 0;
                self.unknown_task(ctx, "HTTP 404")
            }
            StatusReply::Unreadable(detail) => self.malformed(ctx, &detail),
            StatusReply::Body(value) => match serde_json::from_value::<StatusResponse>(value) {
                Ok(response) => {
                    self.consecutive_malformed = 0;
                    self.interpret(ctx, response)
                }
                Err(e) => self.malformed(ctx, &e.to_string()),
            },
        }
    }

    fn interpret(&self, ctx: PollContext, response: StatusResponse) -> Verdict {
        match response.status {
            RemoteStatus::Pending | RemoteStatus::Processing => {
                debug!(attempt = ctx.attempt, status = ?response.status, "Task still in progress");
                Verdict::Continue
            }
            RemoteStatus::Completed => {
                let duration = response
                    .duration
                    .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                    .unwrap_or(ctx.elapsed);

                Verdict::Terminal(TaskResult::Completed {
                    payload: response.result.unwrap_or(serde_json::Value::Null),
                    duration,
                })
            }
            RemoteStatus::Failed => {
                let reason = response
                    .error_message()
                    .unwrap_or_else(|| DEFAULT_FAILURE.to_string());

                Verdict::Terminal(TaskResult::Failed { reason })
            }
            RemoteStatus::NotFound => self.unknown_task(ctx, "not_found status"),
        }
    }

    /// The remote store may lag behind the submission, so an unknown task is
    /// only authoritative once the grace period is over
    fn unknown_task(&self, ctx: PollContext, source: &str) -> Verdict {
        if ctx.attempt <= self.not_found_grace {
            debug!(
                attempt = ctx.attempt,
                grace = self.not_found_grace,
                source,
                "Task not visible yet, within grace period"
            );
            Verdict::Continue
        } else {
            Verdict::Terminal(TaskResult::NotFound)
        }
    }

    fn malformed(&mut self, ctx: PollContext, detail: &str) -> Verdict {
        self.consecutive_malformed += 1;

        if self.consecutive_malformed > self.malformed_tolerance {
            warn!(
                attempt = ctx.attempt,
                consecutive = self.consecutive_malformed,
                detail,
                "Malformed status responses persist, giving up"
            );
            return Verdict::Terminal(TaskResult::Failed {
                reason: MALFORMED_RESPONSE.to_string(),
            });
        }

        warn!(
            attempt = ctx.attempt,
            consecutive = self.consecutive_malformed,
            tolerance = self.malformed_tolerance,
            detail,
            "Malformed status response, continuing"
        );
        Verdict::Continue
    }
}
