//! Status command handler
//!
//! One status check, interpreted the same way a polling session would at
//! the end of its grace period.

use anyhow::{Context, Result};
use colored::*;
use std::process::ExitCode;
use std::time::Duration;
use tether_client::TaskClient;
use tether_core::domain::policy::PollPolicy;
use tether_core::domain::task::TaskHandle;
use tether_runner::{PollContext, StatusInterpreter, Verdict};

use super::{exit_code, print_outcome};

/// Exit code while the task is still running
const IN_PROGRESS_EXIT_CODE: u8 = 4;

pub async fn handle_status_command(url: &str, call_timeout_ms: u64) -> Result<ExitCode> {
    let timeout = Duration::from_millis(call_timeout_ms);
    let client = TaskClient::new();
    let handle = TaskHandle::new("", url);

    let reply = client
        .check_status(&handle, timeout)
        .await
        .with_context(|| format!("Status check against {} failed", url))?;

    let mut interpreter = StatusInterpreter::new(&single_check_policy(timeout));
    let ctx = PollContext {
        attempt: 1,
        elapsed: Duration::ZERO,
    };

    match interpreter.evaluate(ctx, reply) {
        Verdict::Continue => {
            println!("{} {}", "…".cyan(), "Still in progress".cyan().bold());
            Ok(ExitCode::from(IN_PROGRESS_EXIT_CODE))
        }
        Verdict::Terminal(result) => {
            print_outcome(&result);
            Ok(exit_code(&result))
        }
    }
}

/// A lone check has no later attempt to wait for, so nothing is tolerated
fn single_check_policy(timeout: Duration) -> PollPolicy {
    PollPolicy {
        initial_delay: Duration::ZERO,
        poll_interval: Duration::ZERO,
        max_attempts: 1,
        per_call_timeout: timeout,
        not_found_grace: 0,
        malformed_tolerance: 0,
    }
}
