//! Task endpoints. Every mutation records an activity row.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, put};
use axum::Router;
use serde_json::json;

use daybook_core::activity::{Activity, ActivityKind};
use daybook_core::task::{NewTask, Task, TaskUpdate};

use crate::error::ApiError;
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(remove))
        .route("/{id}/pin", patch(toggle_pin))
        .route("/{id}/complete", patch(toggle_complete))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    let store = state.store()?;
    Ok(Json(store.list_tasks(&user_id)?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<NewTask>,
) -> Result<impl IntoResponse, ApiError> {
    let task = Task::new(&user_id, input)?;
    let store = state.store()?;
    store.insert_task(&task)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Task,
        "created",
        format!("{} ({})", task.title, task.priority),
    ))?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    let store = state.store()?;
    let mut task = store
        .get_task(&user_id, &id)?
        .ok_or(ApiError::NotFound("Task"))?;
    task.apply_update(input)?;
    store.update_task(&task)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Task,
        "updated",
        task.title.clone(),
    ))?;
    Ok(Json(task))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store()?;
    let task = store
        .get_task(&user_id, &id)?
        .ok_or(ApiError::NotFound("Task"))?;
    store.delete_task(&user_id, &id)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Task,
        "deleted",
        task.title,
    ))?;
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

async fn toggle_pin(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let store = state.store()?;
    let mut task = store
        .get_task(&user_id, &id)?
        .ok_or(ApiError::NotFound("Task"))?;
    task.toggle_pinned();
    store.update_task(&task)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Task,
        if task.pinned { "pinned" } else { "unpinned" },
        task.title.clone(),
    ))?;
    Ok(Json(task))
}

async fn toggle_complete(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let store = state.store()?;
    let mut task = store
        .get_task(&user_id, &id)?
        .ok_or(ApiError::NotFound("Task"))?;
    task.toggle_completed();
    store.update_task(&task)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Task,
        if task.completed { "completed" } else { "marked incomplete" },
        task.title.clone(),
    ))?;
    Ok(Json(task))
}
