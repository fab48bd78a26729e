//! Tether HTTP Client
//!
//! A small, type-safe HTTP client for long-running task endpoints: one call
//! starts the work, another reports its status.
//!
//! The client performs exactly one remote call per method invocation and never
//! retries. Retry and polling policy belong to the caller (see `tether-runner`).
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tether_client::TaskClient;
//! use tether_core::domain::policy::PollPolicy;
//! use tether_core::domain::task::TaskDescriptor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TaskClient::new();
//!     let policy = PollPolicy {
//!         initial_delay: Duration::from_secs(2),
//!         poll_interval: Duration::from_secs(2),
//!         max_attempts: 30,
//!         per_call_timeout: Duration::from_secs(10),
//!         not_found_grace: 2,
//!         malformed_tolerance: 3,
//!     };
//!     let descriptor = TaskDescriptor::new(
//!         "http://localhost:8080/tasks",
//!         serde_json::json!({ "topic": "rust" }),
//!         policy,
//!     );
//!
//!     let handle = client.submit(&descriptor).await?;
//!     let reply = client.check_status(&handle, policy.per_call_timeout).await?;
//!     println!("{}: {:?}", handle.task_id, reply);
//!     Ok(())
//! }
//! ```

pub mod error;
mod tasks;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use tether_core::domain::attempt::StatusReply;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// HTTP client for task submission and status endpoints
#[derive(Debug, Clone, Default)]
pub struct TaskClient {
    /// HTTP client instance
    client: Client,
}

impl TaskClient {
    /// Create a new task client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new task client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, default headers etc.
    /// Per-call timeouts are still applied from the polling policy.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Resolve `target` against `base`
///
/// Absolute targets are returned as-is (normalized); relative targets are
/// joined onto the base URL the way a browser would.
pub fn resolve_url(base: &str, target: &str) -> Result<String> {
    let base = Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base, e)))?;

    base.join(target)
        .map(|url| url.to_string())
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", target, e)))
}
