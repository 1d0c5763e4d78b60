//! API routes configuration module

use crate::api::handlers::{get_task, list_tasks};
use crate::api::AppState;
use axum::{routing::get, Extension, Router};

/// Creates and configures the API router with all routes
///
/// # Arguments
/// * `state` - Shared pool and serializer handed to every handler
///
/// # Returns
/// * `Router` - Configured router with the polling endpoints
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/:id", get(get_task))
        .layer(Extension(state))
}
