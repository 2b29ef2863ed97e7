//! Signup and login flows.
//!
//! Passwords are stored as salted Argon2id digests; sessions are stateless
//! HMAC-signed bearer tokens carrying the user id and an expiry. Login
//! failures collapse into a single "Invalid credentials" answer so callers
//! cannot probe which emails are registered.

pub mod password;
pub mod token;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result, ValidationError};
use crate::storage::Store;
use crate::user::User;

/// Signup payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fresh token plus the profile fields clients show after login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub name: String,
    pub email: String,
}

/// Register a new account and issue its first token.
///
/// # Errors
/// Rejects blank fields, an already-registered email, and propagates
/// storage failures.
pub fn signup(
    store: &Store,
    key: &[u8],
    ttl: Duration,
    now: DateTime<Utc>,
    input: SignupRequest,
) -> Result<AuthResponse> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name").into());
    }
    if input.email.trim().is_empty() {
        return Err(ValidationError::MissingField("email").into());
    }
    if input.password.is_empty() {
        return Err(ValidationError::MissingField("password").into());
    }

    if store.find_user_by_email(&input.email)?.is_some() {
        return Err(AuthError::EmailTaken.into());
    }

    let hash = password::hash_password(&input.password)?;
    let user = User::new(input.name, input.email, hash);
    store.insert_user(&user)?;

    let token = token::issue(key, &user.id, now + ttl);
    Ok(AuthResponse {
        token,
        name: user.name,
        email: user.email,
    })
}

/// Check credentials and issue a token.
///
/// # Errors
/// Unknown email and wrong password both yield `InvalidCredentials`.
pub fn login(
    store: &Store,
    key: &[u8],
    ttl: Duration,
    now: DateTime<Utc>,
    input: LoginRequest,
) -> Result<AuthResponse> {
    let Some(user) = store.find_user_by_email(&input.email)? else {
        return Err(AuthError::InvalidCredentials.into());
    };

    if !password::verify_password(&input.password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = token::issue(key, &user.id, now + ttl);
    Ok(AuthResponse {
        token,
        name: user.name,
        email: user.email,
    })
}
