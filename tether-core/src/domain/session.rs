//! Session state machine
//!
//! ```text
//! Idle -> Submitting -> AwaitingInitialDelay -> Polling -> Completed
//!             |                 |                  |   -> Failed
//!             |                 |                  |   -> TimedOut
//!             |                 |                  |   -> NotFound
//!             +-> Failed        +-> Cancelled      +----> Cancelled
//!             +-> Cancelled
//! ```
//!
//! Transitions are monotonic: nothing leaves a terminal state and no
//! intermediate state is skipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a polling session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Submitting,
    AwaitingInitialDelay,
    Polling,
    Completed,
    Failed,
    TimedOut,
    NotFound,
    /// Caller-initiated stop; distinct from budget exhaustion
    Cancelled,
}

/// Rejected state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid session transition {from} -> {to}")]
pub struct TransitionError {
    pub from: SessionState,
    pub to: SessionState,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed
                | SessionState::Failed
                | SessionState::TimedOut
                | SessionState::NotFound
                | SessionState::Cancelled
        )
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;

        match self {
            Idle => matches!(next, Submitting),
            Submitting => matches!(next, AwaitingInitialDelay | Failed | Cancelled),
            AwaitingInitialDelay => matches!(next, Polling | Cancelled),
            // Polling -> Polling is the "Continue" self-loop
            Polling => matches!(
                next,
                Polling | Completed | Failed | TimedOut | NotFound | Cancelled
            ),
            Completed | Failed | TimedOut | NotFound | Cancelled => false,
        }
    }

    /// Returns the successor state or the rejected edge
    pub fn advance(self, next: SessionState) -> Result<SessionState, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "Idle",
            SessionState::Submitting => "Submitting",
            SessionState::AwaitingInitialDelay => "AwaitingInitialDelay",
            SessionState::Polling => "Polling",
            SessionState::Completed => "Completed",
            SessionState::Failed => "Failed",
            SessionState::TimedOut => "TimedOut",
            SessionState::NotFound => "NotFound",
            SessionState::Cancelled => "Cancelled",
        };
        write!(f, "{}", name)
    }
}

/// Point-in-time view of a session for progress observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Known once submission succeeds
    pub task_id: Option<String>,
    pub attempts_made: u32,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            task_id: None,
            attempts_made: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionState::*;

    const ALL: [SessionState; 9] = [
        Idle,
        Submitting,
        AwaitingInitialDelay,
        Polling,
        Completed,
        Failed,
        TimedOut,
        NotFound,
        Cancelled,
    ];

    #[test]
    fn test_happy_path_transitions() {
        let state = Idle
            .advance(Submitting)
            .and_then(|s| s.advance(AwaitingInitialDelay))
            .and_then(|s| s.advance(Polling))
            .and_then(|s| s.advance(Polling))
            .and_then(|s| s.advance(Completed));
        assert_eq!(state, Ok(Completed));
    }

    #[test]
    fn test_no_skipping_intermediate_states() {
        assert!(Idle.advance(Polling).is_err());
        assert!(Submitting.advance(Polling).is_err());
        assert!(AwaitingInitialDelay.advance(Completed).is_err());
        assert!(AwaitingInitialDelay.advance(TimedOut).is_err());
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(
                    !from.can_transition_to(to),
                    "{} must not transition to {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_cancellation_allowed_from_every_active_state() {
        for from in [Submitting, AwaitingInitialDelay, Polling] {
            assert!(from.can_transition_to(Cancelled));
        }
        assert!(!Idle.can_transition_to(Cancelled));
    }

    #[test]
    fn test_transition_error_message() {
        let err = Completed.advance(Polling).unwrap_err();
        assert_eq!(err.to_string(), "invalid session transition Completed -> Polling");
    }
}
