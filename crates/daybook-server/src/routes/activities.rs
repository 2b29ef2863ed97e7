//! The activity feed, full and recent.

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use daybook_core::activity::{Activity, RECENT_ACTIVITY_LIMIT};

use crate::error::ApiError;
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/recent", get(recent))
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let store = state.store()?;
    Ok(Json(store.list_activities(&user_id, None)?))
}

async fn recent(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let store = state.store()?;
    Ok(Json(store.list_activities(&user_id, Some(RECENT_ACTIVITY_LIMIT))?))
}
