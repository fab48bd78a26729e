//! Run command handler
//!
//! Submits a task, follows its progress and reports the outcome.

use anyhow::Result;
use colored::*;
use std::process::ExitCode;
use tether_core::domain::session::{SessionSnapshot, SessionState};
use tether_runner::{Orchestrator, RunError};
use tracing::{error, info};

use super::{exit_code, print_cancelled, print_outcome};
use crate::config::{Config, PolicyArgs, TaskArgs};

/// Exit code used when the user cancels (128 + SIGINT)
const CANCELLED_EXIT_CODE: u8 = 130;

pub async fn handle_run_command(task: &TaskArgs, policy: &PolicyArgs) -> Result<ExitCode> {
    let config = Config::from_args(task, policy)?;

    println!(
        "{} {}",
        "Submitting to".bold(),
        config.submit_url.cyan()
    );

    let orchestrator = Orchestrator::http();
    let handle = orchestrator.start(config.descriptor())?;

    // Ctrl-C cancels the session; the outcome is still reported below
    let cancel = handle.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling task");
            cancel.cancel();
        }
    });

    let mut progress = handle.progress();
    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let snapshot = progress.borrow_and_update().clone();
            print_progress(&snapshot);
        }
    });

    let outcome = handle.wait().await;
    interrupt.abort();
    let _ = printer.await;

    match outcome {
        Ok(result) => {
            print_outcome(&result);
            Ok(exit_code(&result))
        }
        Err(RunError::Cancelled) => {
            print_cancelled();
            Ok(ExitCode::from(CANCELLED_EXIT_CODE))
        }
        Err(e) => {
            error!("Task run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Print a state change
fn print_progress(snapshot: &SessionSnapshot) {
    match snapshot.state {
        SessionState::AwaitingInitialDelay => {
            let task_id = snapshot.task_id.as_deref().unwrap_or("-");
            println!("  {} Submitted task {}", "▸".cyan(), task_id.bold());
            println!("  {} Waiting before the first status check", "▸".cyan());
        }
        SessionState::Polling if snapshot.attempts_made > 0 => {
            println!(
                "  {} {}",
                "▸".cyan(),
                format!("Still in progress after {} check(s)", snapshot.attempts_made).dimmed()
            );
        }
        SessionState::Polling => {
            println!("  {} Polling", "▸".cyan());
        }
        _ => {}
    }
}
