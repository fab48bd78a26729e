//! Task Repository
//!
//! Handles all storage operations related to tasks.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A submitted task as stored by the server
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: String,
    pub payload: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}

/// In-memory task table
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<String, TaskRecord>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Create a new task in the store
pub async fn create(store: &TaskStore, payload: serde_json::Value) -> TaskRecord {
    let record = TaskRecord {
        id: Uuid::new_v4().to_string(),
        payload,
        submitted_at: Utc::now(),
    };

    store
        .tasks
        .write()
        .await
        .insert(record.id.clone(), record.clone());

    record
}

/// Find a task by ID
pub async fn find_by_id(store: &TaskStore, id: &str) -> Option<TaskRecord> {
    store.tasks.read().await.get(id).cloned()
}

/// Delete a task; returns whether it existed
pub async fn delete(store: &TaskStore, id: &str) -> bool {
    store.tasks.write().await.remove(id).is_some()
}

/// Number of stored tasks
pub async fn count(store: &TaskStore) -> usize {
    store.tasks.read().await.len()
}
