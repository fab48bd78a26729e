//! Task submission and status endpoints

use reqwest::StatusCode;
use std::time::Duration;
use tether_core::domain::attempt::StatusReply;
use tether_core::domain::task::{TaskDescriptor, TaskHandle, expand_status_template};
use tether_core::dto::task::SubmitResponse;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{TaskClient, resolve_url};

impl TaskClient {
    // =============================================================================
    // Submission
    // =============================================================================

    /// Start the work described by `descriptor`
    ///
    /// Issues exactly one `POST` with the payload as JSON body, bounded by the
    /// policy's per-call timeout. Never retried: a repeated "start" call may
    /// duplicate remote side effects.
    ///
    /// The status URL is taken from the response's `statusUrl` when present,
    /// otherwise from the descriptor's status template. Relative URLs are
    /// resolved against the submission URL.
    pub async fn submit(&self, descriptor: &TaskDescriptor) -> Result<TaskHandle> {
        let response = self
            .client
            .post(&descriptor.submit_url)
            .timeout(descriptor.policy.per_call_timeout)
            .json(&descriptor.payload)
            .send()
            .await?;

        let body: SubmitResponse = self.handle_response(response).await?;

        let task_id = body.task_id.trim();
        if task_id.is_empty() {
            return Err(ClientError::ParseError(
                "Submission response carried an empty taskId".to_string(),
            ));
        }

        let raw_status_url = match (body.status_url.as_deref(), &descriptor.status_template) {
            (Some(url), _) if !url.trim().is_empty() => url.to_string(),
            (_, Some(template)) => expand_status_template(template, task_id),
            _ => return Err(ClientError::MissingStatusUrl(task_id.to_string())),
        };

        let status_url = resolve_url(&descriptor.submit_url, &raw_status_url)?;

        debug!(task_id, status_url = %status_url, "Task submitted");

        Ok(TaskHandle::new(task_id, status_url))
    }

    // =============================================================================
    // Status
    // =============================================================================

    /// Check the status of a submitted task
    ///
    /// Issues exactly one `GET` against the handle's status URL.
    ///
    /// # Returns
    /// * `StatusReply::Body` for a 2xx JSON response
    /// * `StatusReply::Unreadable` for a 2xx response that is not JSON
    /// * `StatusReply::Missing` for a 404
    /// * `ClientError` for any other status or a transport failure
    pub async fn check_status(&self, handle: &TaskHandle, timeout: Duration) -> Result<StatusReply> {
        let response = self
            .client
            .get(&handle.status_url)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(StatusReply::Missing);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let text = response.text().await?;

        match serde_json::from_str(&text) {
            Ok(value) => Ok(StatusReply::Body(value)),
            Err(e) => Ok(StatusReply::Unreadable(format!(
                "Response is not JSON ({}): {}",
                e,
                truncate(&text, 200)
            ))),
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
