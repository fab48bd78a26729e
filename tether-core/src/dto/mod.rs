//! Data Transfer Objects for the task endpoints
//!
//! Wire shapes exchanged with submission and status endpoints. Field names
//! follow the remote's camelCase convention.

pub mod task;
