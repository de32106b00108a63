//! services/api/src/web/tasks.rs
//!
//! The study planner. Tasks are read straight from the `TaskStore` on every
//! request; they are not held by the tracker.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use study_tracker_core::domain::{NewTask, StudyTask, TaskPatch, TaskUpdate};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::{invalid, port_error, HandlerError};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TaskQuery {
    /// Only tasks scheduled on this day (`YYYY-MM-DD`).
    pub date: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/tasks",
    params(TaskQuery),
    responses((status = 200, description = "The user's tasks by scheduled date", body = [StudyTask])),
    tag = "tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<StudyTask>>, HandlerError> {
    state
        .tasks
        .list_tasks(user_id, query.date)
        .await
        .map(Json)
        .map_err(|e| port_error("load tasks", e))
}

#[utoipa::path(
    post,
    path = "/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task scheduled", body = StudyTask),
        (status = 400, description = "Blank title")
    ),
    tag = "tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(new): Json<NewTask>,
) -> Result<impl IntoResponse, HandlerError> {
    new.validate().map_err(invalid)?;
    let task = state
        .tasks
        .insert_task(user_id, new)
        .await
        .map_err(|e| port_error("save task", e))?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "Task updated", body = StudyTask),
        (status = 400, description = "Invalid or empty patch"),
        (status = 404, description = "No such task")
    ),
    tag = "tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
    Json(fields): Json<TaskPatch>,
) -> Result<Json<StudyTask>, HandlerError> {
    let update = TaskUpdate { id, fields };
    update.fields.validate().map_err(invalid)?;
    state
        .tasks
        .update_task(user_id, update.id, &update.fields)
        .await
        .map(Json)
        .map_err(|e| port_error("update task", e))
}

#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "No such task")
    ),
    tag = "tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    state
        .tasks
        .delete_task(user_id, id)
        .await
        .map_err(|e| port_error("delete task", e))?;
    Ok(StatusCode::NO_CONTENT)
}
