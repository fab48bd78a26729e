//! Poll attempt types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A status endpoint reply that reached us over the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusReply {
    /// 2xx response with a JSON body
    Body(serde_json::Value),

    /// HTTP 404: the remote does not (yet) know the task
    Missing,

    /// 2xx response whose body is not JSON
    Unreadable(String),
}

/// What happened during a single poll tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Reply(StatusReply),
    TransportError(String),
}

/// One status check
///
/// Ephemeral: lives for the duration of one evaluation and is only kept
/// around for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollAttempt {
    /// 1-based sequence number within the session
    pub sequence: u32,
    pub at: DateTime<Utc>,
    pub outcome: AttemptOutcome,
}

impl PollAttempt {
    pub fn new(sequence: u32, outcome: AttemptOutcome) -> Self {
        Self {
            sequence,
            at: Utc::now(),
            outcome,
        }
    }
}
