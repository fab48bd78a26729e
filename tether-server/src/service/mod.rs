//! Service Module
//!
//! Business logic layer for the server.
//! Services orchestrate between repositories and contain domain logic.

pub mod task;

// Re-export for convenience
pub use task as task_service;
