use axum::extract::{Extension, Path};
use axum::Json;
use serde::Serialize;

use super::errors::ApiError;
use super::AppState;
use crate::errors::Error;
use crate::serializer::Template;

/// Response envelope for the task list endpoint
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub data: Vec<Template>,
}

/// Response envelope for the single-task endpoint
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub data: Template,
}

/// Lists snapshots of every root task in the pool, in insertion order
///
/// # Returns
///
/// * `Result<Json<TaskListResponse>, ApiError>` - The full snapshot list,
///   or a failure when any output converter rejects its input
#[axum::debug_handler]
pub async fn list_tasks(
    Extension(state): Extension<AppState>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let data = state.serializer.template_list(&state.pool)?;
    Ok(Json(TaskListResponse {
        success: true,
        data,
    }))
}

/// Retrieves the snapshot of one task by its wire identifier
///
/// The lookup is forest-wide: roots first, then subtasks breadth-first.
///
/// # Arguments
/// * `id` - Wire form of the task identifier
///
/// # Returns
/// * `Result<Json<TaskResponse>, ApiError>` - The snapshot, a 404 when no
///   task matches anywhere in the forest, or a conversion failure
#[axum::debug_handler]
pub async fn get_task(
    Path(id): Path<String>,
    Extension(state): Extension<AppState>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .pool
        .find_by_wire_id(&id)
        .ok_or_else(|| ApiError::from(Error::TaskNotFound(id.clone())))?;
    let data = state.serializer.template(&task)?;
    Ok(Json(TaskResponse {
        success: true,
        data,
    }))
}
