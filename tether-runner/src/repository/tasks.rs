//! Tasks repository
//!
//! Handles communication with the remote task endpoints:
//! - Submitting work
//! - Fetching task status

use async_trait::async_trait;
use std::time::Duration;
use tether_client::{ClientError, TaskClient};
use tether_core::domain::attempt::StatusReply;
use tether_core::domain::task::{TaskDescriptor, TaskHandle};

/// Repository trait for remote task operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Starts the work described by `descriptor`
    ///
    /// Exactly one remote call per invocation; implementations must not retry.
    async fn submit(&self, descriptor: &TaskDescriptor) -> Result<TaskHandle, ClientError>;

    /// Fetches the current status of a submitted task
    ///
    /// # Arguments
    /// * `handle` - The handle returned by `submit`
    /// * `timeout` - Upper bound for the call
    async fn fetch_status(
        &self,
        handle: &TaskHandle,
        timeout: Duration,
    ) -> Result<StatusReply, ClientError>;
}

/// HTTP implementation of TaskRepository
#[derive(Debug, Clone, Default)]
pub struct HttpTaskRepository {
    client: TaskClient,
}

impl HttpTaskRepository {
    /// Creates a new HTTP task repository
    pub fn new(client: TaskClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskRepository for HttpTaskRepository {
    async fn submit(&self, descriptor: &TaskDescriptor) -> Result<TaskHandle, ClientError> {
        self.client.submit(descriptor).await
    }

    async fn fetch_status(
        &self,
        handle: &TaskHandle,
        timeout: Duration,
    ) -> Result<StatusReply, ClientError> {
        self.client.check_status(handle, timeout).await
    }
}
