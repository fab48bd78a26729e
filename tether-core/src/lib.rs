//! Tether Core
//!
//! Core types for the Tether task submission and polling system.
//!
//! This crate contains:
//! - Domain types: task descriptors, handles, poll attempts, results and the
//!   session state machine
//! - DTOs: wire shapes exchanged with submission and status endpoints

pub mod domain;
pub mod dto;
