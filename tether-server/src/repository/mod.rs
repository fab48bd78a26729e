//! Repository Module
//!
//! Data access layer for the server. Tasks live in memory only; a restart
//! forgets every task, which status checks then report as `not_found`.

pub mod task;

// Re-export for convenience
pub use task as task_repository;
pub use task::{TaskRecord, TaskStore};
