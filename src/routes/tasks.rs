// SPDX-License-Identifier: MIT

//! Task board routes for authenticated users.
//!
//! Everything here sits behind the session middleware; handlers receive the
//! signed-in user as an `AuthUser` extension. Task ids from other users are
//! indistinguishable from ids that do not exist.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Task, TaskInput};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use validator::Validate;

/// How far `POST /tasks/{id}/defer` pushes a task: to tomorrow.
const DEFER_DAYS: i64 = 1;

/// Task routes (require a session; the middleware is applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/complete", post(complete_task))
        .route("/tasks/{id}/uncomplete", post(uncomplete_task))
        .route("/tasks/{id}/defer", post(defer_task))
}

// ─── Board ───────────────────────────────────────────────────

/// Today's board: every open task due today or earlier.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Task>>> {
    let tasks = state.tasks.list_due_today(user.user_id).await?;
    Ok(Json(tasks))
}

/// Create a task on today's board.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<TaskInput>,
) -> Result<(StatusCode, Json<Task>)> {
    input.validate()?;

    let task = state.tasks.create(user.user_id, &input).await?;

    tracing::debug!(user_id = user.user_id, task_id = task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

// ─── Single Task ─────────────────────────────────────────────

/// Get one task.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Task>> {
    let task = state
        .tasks
        .get(user.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Rewrite a task's summary and description.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> Result<Json<Task>> {
    input.validate()?;

    let task = state
        .tasks
        .update(user.user_id, id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Delete a task. Deleting an already-deleted (or foreign) task is a 404.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let deleted = state.tasks.delete(user.user_id, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Task {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ─── Status & Scheduling ─────────────────────────────────────

/// Mark a task done. Idempotent.
async fn complete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Task>> {
    require_ownership(&state, &user, id).await?;

    let task = state
        .tasks
        .complete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Put a completed task back on the board. Idempotent.
async fn uncomplete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Task>> {
    require_ownership(&state, &user, id).await?;

    let task = state
        .tasks
        .uncomplete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// Push a task to tomorrow.
async fn defer_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Task>> {
    require_ownership(&state, &user, id).await?;

    let task = state
        .tasks
        .defer(id, DEFER_DAYS)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))?;

    Ok(Json(task))
}

/// The status and scheduling updates are keyed by task id alone, so check
/// the task belongs to the caller first.
async fn require_ownership(state: &Arc<AppState>, user: &AuthUser, task_id: i64) -> Result<()> {
    state
        .tasks
        .get(user.user_id, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;

    Ok(())
}
