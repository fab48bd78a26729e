//! API Module
//!
//! HTTP API layer for the task server.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod task;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::SimulationConfig;
use crate::repository::TaskStore;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<TaskStore>,
    pub simulation: SimulationConfig,
}

impl AppState {
    pub fn new(simulation: SimulationConfig) -> Self {
        Self {
            store: Arc::new(TaskStore::new()),
            simulation,
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Task endpoints
        .route("/tasks", post(task::submit_task))
        .route("/tasks/{id}", get(task::get_task_status).delete(task::delete_task))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
