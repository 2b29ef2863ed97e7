//! Signup and login endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use chrono::Utc;

use daybook_core::auth::{self, AuthResponse, LoginRequest, SignupRequest};

use crate::error::ApiError;
use crate::extract::Json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store()?;
    let response = auth::signup(&store, &state.signing_key, state.token_ttl, Utc::now(), input)?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let store = state.store()?;
    let response = auth::login(&store, &state.signing_key, state.token_ttl, Utc::now(), input)?;
    Ok(Json(response))
}
