//! Habit endpoints: list with window normalization, CRUD, and the
//! complete/undo actions.
//!
//! The clock enters here: handlers pass `Utc::now()` into the engine, which
//! never reads time on its own.

use axum::extract::{Path, State};
use axum::routing::{get, patch, put};
use axum::Router;
use chrono::Utc;
use serde_json::json;

use daybook_core::habit::{Habit, HabitUpdate, NewHabit};

use crate::error::ApiError;
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(remove))
        .route("/{id}/pin", patch(toggle_pin))
        .route("/{id}/complete", patch(complete))
        .route("/{id}/undo", patch(undo))
}

/// List the user's habits after rolling stale windows forward.
async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Habit>>, ApiError> {
    let now = Utc::now();
    let store = state.store()?;
    let mut habits = store.list_habits(&user_id)?;

    for habit in &mut habits {
        if habit.normalize(now) {
            // One broken row must not block the rest of the list.
            if let Err(err) = store.update_habit(habit) {
                tracing::warn!("failed to persist reset for habit {}: {err}", habit.id);
            }
        }
    }

    Ok(Json(habits))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<NewHabit>,
) -> Result<Json<Habit>, ApiError> {
    let habit = Habit::new(user_id, input)?;
    let store = state.store()?;
    store.insert_habit(&habit)?;
    Ok(Json(habit))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<HabitUpdate>,
) -> Result<Json<Habit>, ApiError> {
    let store = state.store()?;
    let mut habit = store
        .get_habit(&user_id, &id)?
        .ok_or(ApiError::NotFound("Habit"))?;
    habit.apply_update(input)?;
    store.update_habit(&habit)?;
    Ok(Json(habit))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store()?;
    if !store.delete_habit(&user_id, &id)? {
        return Err(ApiError::NotFound("Habit"));
    }
    Ok(Json(json!({ "message": "Habit deleted successfully" })))
}

async fn toggle_pin(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Habit>, ApiError> {
    let store = state.store()?;
    let mut habit = store
        .get_habit(&user_id, &id)?
        .ok_or(ApiError::NotFound("Habit"))?;
    habit.pinned = !habit.pinned;
    store.update_habit(&habit)?;
    Ok(Json(habit))
}

/// Mark progress for the current window; a no-op once the window is done.
async fn complete(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Habit>, ApiError> {
    let store = state.store()?;
    let mut habit = store
        .get_habit(&user_id, &id)?
        .ok_or(ApiError::NotFound("Habit"))?;
    if habit.complete(Utc::now()) {
        store.update_habit(&habit)?;
    }
    Ok(Json(habit))
}

/// Step a counter habit backward. Streak and completion history stay.
async fn undo(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Habit>, ApiError> {
    let store = state.store()?;
    let mut habit = store
        .get_habit(&user_id, &id)?
        .ok_or(ApiError::NotFound("Habit"))?;
    habit.undo()?;
    store.update_habit(&habit)?;
    Ok(Json(habit))
}
