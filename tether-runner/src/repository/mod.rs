//! Repository layer
//!
//! Repositories abstract communication with the remote task endpoints. They
//! provide a narrow interface (submit, fetch status) without any polling or
//! interpretation logic.
//!
//! The repository is trait-based so sessions can be driven by scripted
//! backends in tests.

#[cfg(test)]
pub(crate) mod mock;
mod tasks;

// Re-export trait
pub use tasks::TaskRepository;

// Re-export implementation
pub use tasks::HttpTaskRepository;
