//! Core error types for daybook-core.
//!
//! This module defines the error hierarchy using thiserror. The three
//! caller-visible classes are lookup failures (`NotFound`), rejected input
//! (`Validation`) and credential problems (`Auth`); storage failures
//! propagate unchanged to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daybook-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Record lookup failures (absent id, or owned by another user)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Validation errors for user-supplied values.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Missing or empty required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Counter habit created without a usable target
    #[error("Invalid daily target")]
    InvalidDailyTarget,

    /// Ledger entry created without the full set of required fields
    #[error("All fields are required")]
    IncompleteExpense,

    /// Undo requested on a habit type without reversible progress
    #[error("Undo is only available for counter habits")]
    UndoUnsupported,
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Signup with an email that is already registered
    #[error("Email already exists")]
    EmailTaken,

    /// Unknown email or wrong password (not distinguished to the caller)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Malformed, tampered, or expired bearer token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Password hashing failed
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
