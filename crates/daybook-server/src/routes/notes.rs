//! Note endpoints. Every mutation records an activity row.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, put};
use axum::Router;
use serde_json::json;

use daybook_core::activity::{Activity, ActivityKind};
use daybook_core::note::{NewNote, Note, NoteUpdate};

use crate::error::ApiError;
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", put(update).delete(remove))
        .route("/{id}/pin", patch(toggle_pin))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Note>>, ApiError> {
    let store = state.store()?;
    Ok(Json(store.list_notes(&user_id)?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<NewNote>,
) -> Result<impl IntoResponse, ApiError> {
    let note = Note::new(&user_id, input)?;
    let store = state.store()?;
    store.insert_note(&note)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Note,
        "created",
        note.title.clone(),
    ))?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<NoteUpdate>,
) -> Result<Json<Note>, ApiError> {
    let store = state.store()?;
    let mut note = store
        .get_note(&user_id, &id)?
        .ok_or(ApiError::NotFound("Note"))?;
    note.apply_update(input)?;
    store.update_note(&note)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Note,
        "updated",
        note.title.clone(),
    ))?;
    Ok(Json(note))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store()?;
    let note = store
        .get_note(&user_id, &id)?
        .ok_or(ApiError::NotFound("Note"))?;
    store.delete_note(&user_id, &id)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Note,
        "deleted",
        note.title,
    ))?;
    Ok(Json(json!({ "message": "Note deleted successfully" })))
}

/// Toggle the pin and answer with a confirmation wrapper around the note.
async fn toggle_pin(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store()?;
    let mut note = store
        .get_note(&user_id, &id)?
        .ok_or(ApiError::NotFound("Note"))?;
    note.toggle_pinned();
    store.update_note(&note)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Note,
        if note.pinned { "pinned" } else { "unpinned" },
        note.title.clone(),
    ))?;

    let message = if note.pinned {
        "Note pinned successfully"
    } else {
        "Note unpinned successfully"
    };
    Ok(Json(json!({ "message": message, "note": note })))
}
