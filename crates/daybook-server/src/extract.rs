//! Request extractors: bearer-token auth and JSON bodies.

use axum::extract::{FromRef, FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use daybook_core::auth::token;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user id, taken from the `Authorization` header.
///
/// Routes that take this extractor are token-protected: a missing header is
/// 401 "No token provided", anything unverifiable is 401 "Invalid or
/// expired token".
pub struct CurrentUser(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Err(ApiError::Unauthenticated("No token provided"));
        };
        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        let state = AppState::from_ref(state);
        let user_id = token::verify(&state.signing_key, token, Utc::now())
            .map_err(|_| ApiError::Unauthenticated("Invalid or expired token"))?;
        Ok(CurrentUser(user_id))
    }
}

/// JSON body in both directions, rejecting malformed payloads with the
/// API's `{ "message": ... }` error shape instead of axum's plain text.
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(_) => Err(ApiError::BadRequest("Invalid request body".to_string())),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
