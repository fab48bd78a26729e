//! Scripted repository for session and orchestrator tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tether_client::ClientError;
use tether_core::domain::attempt::StatusReply;
use tether_core::domain::task::{TaskDescriptor, TaskHandle};

use super::TaskRepository;

/// One scripted status call
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Reply(StatusReply),
    /// Fails with a gateway error
    Transport,
    /// Takes `Duration` before replying
    Slow(Duration, StatusReply),
}

pub(crate) fn status(status: &str) -> Step {
    Step::Reply(StatusReply::Body(json!({ "taskId": "T1", "status": status })))
}

pub(crate) fn completed(result: serde_json::Value) -> Step {
    Step::Reply(StatusReply::Body(
        json!({ "taskId": "T1", "status": "completed", "result": result, "duration": 1.5 }),
    ))
}

pub(crate) struct MockRepository {
    fail_submit: bool,
    steps: Mutex<VecDeque<Step>>,
    submit_calls: AtomicU32,
    status_calls: AtomicU32,
}

impl MockRepository {
    /// Scripted status replies; `processing` once the script runs out
    pub(crate) fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            fail_submit: false,
            steps: Mutex::new(steps.into_iter().collect()),
            submit_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
        })
    }

    pub(crate) fn failing_submit() -> Arc<Self> {
        Arc::new(Self {
            fail_submit: true,
            steps: Mutex::new(VecDeque::new()),
            submit_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
        })
    }

    pub(crate) fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskRepository for MockRepository {
    async fn submit(&self, _descriptor: &TaskDescriptor) -> Result<TaskHandle, ClientError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_submit {
            return Err(ClientError::api_error(503, "worker pool exhausted"));
        }

        Ok(TaskHandle::new("T1", "http://mock/status/T1"))
    }

    async fn fetch_status(
        &self,
        _handle: &TaskHandle,
        _timeout: Duration,
    ) -> Result<StatusReply, ClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);

        let step = self.steps.lock().unwrap().pop_front();
        match step.unwrap_or_else(|| status("processing")) {
            Step::Reply(reply) => Ok(reply),
            Step::Transport => Err(ClientError::api_error(502, "bad gateway")),
            Step::Slow(delay, reply) => {
                tokio::time::sleep(delay).await;
                Ok(reply)
            }
        }
    }
}
