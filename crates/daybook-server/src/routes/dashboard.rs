//! The dashboard aggregate.

use axum::extract::State;
use chrono::Utc;

use daybook_core::dashboard::{self, DashboardSummary};

use crate::error::ApiError;
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

/// Cross-section counters. Habits are normalized first so the completion
/// counts reflect the current window.
pub async fn summary(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    let now = Utc::now();
    let store = state.store()?;

    let mut habits = store.list_habits(&user_id)?;
    for habit in &mut habits {
        if habit.normalize(now) {
            if let Err(err) = store.update_habit(habit) {
                tracing::warn!("failed to persist reset for habit {}: {err}", habit.id);
            }
        }
    }

    let summary = dashboard::build_summary(
        &store.list_tasks(&user_id)?,
        &store.list_expenses(&user_id)?,
        &store.list_notes(&user_id)?,
        &habits,
    );
    Ok(Json(summary))
}
