//! Shared state handed to every request handler.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Duration;
use daybook_core::auth::token;
use daybook_core::Store;

use crate::error::ApiError;

/// The store plus token-signing material.
///
/// rusqlite connections are not `Sync`, so the store lives behind a mutex.
/// Each handler locks across its whole load-modify-save sequence, which
/// serializes habit read-modify-write between concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    pub signing_key: Arc<Vec<u8>>,
    pub token_ttl: Duration,
}

impl AppState {
    pub fn new(store: Store, secret: &str, token_ttl: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            signing_key: Arc::new(token::signing_key(secret)),
            token_ttl,
        }
    }

    /// Lock the store for the duration of one handler.
    pub fn store(&self) -> Result<MutexGuard<'_, Store>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("store mutex poisoned".to_string()))
    }
}
