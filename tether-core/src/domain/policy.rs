//! Polling policy
//!
//! Timing and budget parameters for one polling session. The core carries no
//! defaults: every value is supplied by the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and budget parameters for one polling session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Wait between submission and the first status check
    pub initial_delay: Duration,

    /// Wait between consecutive status checks
    pub poll_interval: Duration,

    /// Total number of status checks before the session times out
    pub max_attempts: u32,

    /// Upper bound for a single network call (submission or status check)
    pub per_call_timeout: Duration,

    /// Number of leading attempts during which an unknown-task reply
    /// (HTTP 404 or a `not_found` body) is treated as not yet visible
    pub not_found_grace: u32,

    /// Number of consecutive malformed replies tolerated before the session
    /// fails with "malformed response"
    pub malformed_tolerance: u32,
}

impl PollPolicy {
    /// Validates the policy
    ///
    /// Returns a description of the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }

        if self.poll_interval.is_zero() {
            return Err("poll_interval must be greater than 0".to_string());
        }

        if self.per_call_timeout.is_zero() {
            return Err("per_call_timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Upper bound on session wall time, excluding network latency
    pub fn session_budget(&self) -> Duration {
        self.initial_delay + self.poll_interval.saturating_mul(self.max_attempts)
    }
}
