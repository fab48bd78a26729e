//! Submit command handler

use anyhow::{Context, Result};
use colored::*;
use std::process::ExitCode;
use tether_client::TaskClient;

use crate::config::{Config, PolicyArgs, TaskArgs};

/// Submit a task without polling it
pub async fn handle_submit_command(task: &TaskArgs, policy: &PolicyArgs) -> Result<ExitCode> {
    let config = Config::from_args(task, policy)?;
    let client = TaskClient::new();

    let handle = client
        .submit(&config.descriptor())
        .await
        .context("Submission failed")?;

    println!("{}", "✓ Task submitted".green().bold());
    println!("  Task ID:      {}", handle.task_id.bold());
    println!("  Status URL:   {}", handle.status_url.cyan());
    println!(
        "  Submitted:    {}",
        handle
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );

    Ok(ExitCode::SUCCESS)
}
