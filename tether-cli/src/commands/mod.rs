//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod run;
mod status;
mod submit;

use clap::{Args, Subcommand};
use colored::*;
use std::process::ExitCode;
use tether_core::domain::result::TaskResult;

use crate::config::{PolicyArgs, TaskArgs};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a task and poll it until it reaches a terminal outcome
    Run(TaskCommandArgs),
    /// Submit a task without polling; prints its id and status URL
    Submit(TaskCommandArgs),
    /// Check a status URL once and print the interpreted reply
    Status {
        /// Status URL returned by a previous submission
        url: String,

        /// Timeout for the status call
        #[arg(long, env = "TETHER_CALL_TIMEOUT_MS", default_value_t = 10000)]
        call_timeout_ms: u64,
    },
}

#[derive(Args)]
pub struct TaskCommandArgs {
    #[command(flatten)]
    pub task: TaskArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module and returns the
/// process exit code.
pub async fn handle_command(command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Run(args) => run::handle_run_command(&args.task, &args.policy).await,
        Commands::Submit(args) => submit::handle_submit_command(&args.task, &args.policy).await,
        Commands::Status {
            url,
            call_timeout_ms,
        } => status::handle_status_command(&url, call_timeout_ms).await,
    }
}

/// Exit code reported for each terminal outcome
pub fn exit_code(result: &TaskResult) -> ExitCode {
    match result {
        TaskResult::Completed { .. } => ExitCode::SUCCESS,
        TaskResult::Failed { .. } => ExitCode::from(1),
        TaskResult::TimedOut { .. } => ExitCode::from(2),
        TaskResult::NotFound => ExitCode::from(3),
    }
}

/// Print a terminal outcome
fn print_outcome(result: &TaskResult) {
    match result {
        TaskResult::Completed { payload, duration } => {
            println!(
                "{} {}",
                "✓".green(),
                format!("Completed in {:.1}s", duration.as_secs_f64()).green().bold()
            );
            println!(
                "{}",
                serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
            );
        }
        TaskResult::Failed { reason } => {
            println!("{} {}", "✗".red(), "Failed".red().bold());
            println!("  Reason: {}", reason);
        }
        TaskResult::TimedOut { attempts_made } => {
            println!(
                "{} {}",
                "⏱".yellow(),
                format!("Timed out after {} attempt(s)", attempts_made)
                    .yellow()
                    .bold()
            );
            println!(
                "  {}",
                "The task may still finish; re-check later with `tether status`.".dimmed()
            );
        }
        TaskResult::NotFound => {
            println!("{} {}", "?".magenta(), "Task not found".magenta().bold());
        }
    }
}

fn print_cancelled() {
    println!("{} {}", "■".blue(), "Cancelled".blue().bold());
}
