//! Route table. Everything except `/api/auth/*` requires a bearer token.

pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod habits;
pub mod notes;
pub mod tasks;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// All `/api` routes.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/habits", habits::router())
        .nest("/api/tasks", tasks::router())
        .nest("/api/notes", notes::router())
        .nest("/api/expenses", expenses::router())
        .route("/api/dashboard-summary", get(dashboard::summary))
        .nest("/api/activities", activities::router())
}
