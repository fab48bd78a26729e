//! Core domain types
//!
//! This module contains the value types shared by the client (which produces
//! handles and replies), the runner (which drives sessions) and the CLI
//! (which renders outcomes).

pub mod attempt;
pub mod policy;
pub mod result;
pub mod session;
pub mod task;
