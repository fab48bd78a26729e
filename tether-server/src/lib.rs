//! Tether reference task server
//!
//! A small backend implementing the submission and status endpoints that
//! `tether-runner` drives. Work is simulated: each task is `pending`, then
//! `processing`, then `completed` (or `failed` when its payload asks for it),
//! purely as a function of time since submission.
//!
//! Architecture:
//! - API: axum handlers and error mapping
//! - Service: task lifecycle and the simulated timeline
//! - Repository: in-memory task store

pub mod api;
pub mod config;
pub mod repository;
pub mod service;

pub use api::{AppState, create_router};
pub use config::{Config, SimulationConfig};

use tokio::net::TcpListener;

/// Serves the task API on `listener` until the process stops
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, create_router(state)).await
}
