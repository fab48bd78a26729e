//! Configuration module
//!
//! Turns command-line arguments (with `TETHER_*` environment fallbacks) into
//! a validated task descriptor.

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tether_core::domain::policy::PollPolicy;
use tether_core::domain::task::TaskDescriptor;

/// Where and what to submit
#[derive(Args, Debug, Clone)]
pub struct TaskArgs {
    /// URL that starts the remote work
    #[arg(long, env = "TETHER_SUBMIT_URL")]
    pub url: String,

    /// JSON payload sent as the request body
    #[arg(long, conflicts_with = "payload_file")]
    pub payload: Option<String>,

    /// Read the JSON payload from a file
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// Status URL template used when the server omits `statusUrl`, e.g. "/tasks/{taskId}"
    #[arg(long, env = "TETHER_STATUS_TEMPLATE")]
    pub status_template: Option<String>,
}

/// Polling policy knobs
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Wait after submission before the first status check
    #[arg(long, env = "TETHER_INITIAL_DELAY_MS", default_value_t = 2000)]
    pub initial_delay_ms: u64,

    /// Wait between status checks
    #[arg(long, env = "TETHER_POLL_INTERVAL_MS", default_value_t = 2000)]
    pub poll_interval_ms: u64,

    /// Give up after this many status checks
    #[arg(long, env = "TETHER_MAX_ATTEMPTS", default_value_t = 30)]
    pub max_attempts: u32,

    /// Timeout for each individual HTTP call
    #[arg(long, env = "TETHER_CALL_TIMEOUT_MS", default_value_t = 10000)]
    pub call_timeout_ms: u64,

    /// Early "not found" replies tolerated before reporting NotFound
    #[arg(long, env = "TETHER_NOT_FOUND_GRACE", default_value_t = 2)]
    pub not_found_grace: u32,

    /// Consecutive malformed replies tolerated before failing
    #[arg(long, env = "TETHER_MALFORMED_TOLERANCE", default_value_t = 3)]
    pub malformed_tolerance: u32,
}

impl PolicyArgs {
    pub fn to_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_attempts,
            per_call_timeout: Duration::from_millis(self.call_timeout_ms),
            not_found_grace: self.not_found_grace,
            malformed_tolerance: self.malformed_tolerance,
        }
    }
}

/// CLI configuration for one task
#[derive(Debug, Clone)]
pub struct Config {
    pub submit_url: String,
    pub payload: serde_json::Value,
    pub status_template: Option<String>,
    pub policy: PollPolicy,
}

impl Config {
    /// Builds and validates the configuration
    pub fn from_args(task: &TaskArgs, policy: &PolicyArgs) -> Result<Self> {
        let payload = load_payload(task.payload.as_deref(), task.payload_file.as_ref())?;

        let config = Self {
            submit_url: task.url.clone(),
            payload,
            status_template: task.status_template.clone(),
            policy: policy.to_policy(),
        };
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.submit_url.trim().is_empty() {
            bail!("submit URL cannot be empty");
        }

        if is_empty_payload(&self.payload) {
            bail!("payload cannot be empty");
        }

        if let Some(template) = &self.status_template {
            if template.trim().is_empty() {
                bail!("status template cannot be empty");
            }
        }

        self.policy
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid polling policy: {}", e))
    }

    pub fn descriptor(&self) -> TaskDescriptor {
        let descriptor =
            TaskDescriptor::new(&self.submit_url, self.payload.clone(), self.policy);

        match &self.status_template {
            Some(template) => descriptor.with_status_template(template),
            None => descriptor,
        }
    }
}

fn load_payload(inline: Option<&str>, file: Option<&PathBuf>) -> Result<serde_json::Value> {
    let raw = match (inline, file) {
        (Some(raw), _) => raw.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file {}", path.display()))?,
        (None, None) => bail!("a payload is required (--payload or --payload-file)"),
    };

    if raw.trim().is_empty() {
        bail!("payload cannot be empty");
    }

    serde_json::from_str(&raw).context("Payload is not valid JSON")
}

fn is_empty_payload(payload: &serde_json::Value) -> bool {
    match payload {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        task: TaskArgs,

        #[command(flatten)]
        policy: PolicyArgs,
    }

    fn parse(args: &[&str]) -> TestCli {
        TestCli::try_parse_from(std::iter::once("tether").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_policy_defaults() {
        let cli = parse(&["--url", "http://localhost:8080/tasks", "--payload", "{\"a\":1}"]);
        let policy = cli.policy.to_policy();

        assert_eq!(policy.initial_delay, Duration::from_secs(2));
        assert_eq!(policy.poll_interval, Duration::from_secs(2));
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.per_call_timeout, Duration::from_secs(10));
        assert_eq!(policy.not_found_grace, 2);
        assert_eq!(policy.malformed_tolerance, 3);
    }

    #[test]
    fn test_builds_descriptor() {
        let cli = parse(&[
            "--url",
            "http://localhost:8080/tasks",
            "--payload",
            "{\"topic\":\"rust\"}",
            "--status-template",
            "/tasks/{taskId}",
            "--max-attempts",
            "5",
        ]);

        let config = Config::from_args(&cli.task, &cli.policy).unwrap();
        let descriptor = config.descriptor();

        assert_eq!(descriptor.submit_url, "http://localhost:8080/tasks");
        assert_eq!(descriptor.payload, json!({"topic": "rust"}));
        assert_eq!(descriptor.status_template.as_deref(), Some("/tasks/{taskId}"));
        assert_eq!(descriptor.policy.max_attempts, 5);
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        for payload in ["{}", "null", "\"  \"", "   "] {
            let cli = parse(&["--url", "http://localhost:8080/tasks", "--payload", payload]);
            assert!(Config::from_args(&cli.task, &cli.policy).is_err(), "{}", payload);
        }
    }

    #[test]
    fn test_missing_or_invalid_payload_is_rejected() {
        let cli = parse(&["--url", "http://localhost:8080/tasks"]);
        assert!(Config::from_args(&cli.task, &cli.policy).is_err());

        let cli = parse(&["--url", "http://localhost:8080/tasks", "--payload", "{not json"]);
        assert!(Config::from_args(&cli.task, &cli.policy).is_err());
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let cli = parse(&[
            "--url",
            "http://localhost:8080/tasks",
            "--payload",
            "[1]",
            "--max-attempts",
            "0",
        ]);
        assert!(Config::from_args(&cli.task, &cli.policy).is_err());
    }
}
