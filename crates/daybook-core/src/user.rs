//! User accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email, matched exactly as stored
    pub email: String,
    /// Salted Argon2id digest; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build an account record around an already-hashed password.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serializes() {
        let user = User::new("Asha", "asha@example.com", "salt$digest");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("salt$digest"));
        assert!(json.contains("asha@example.com"));
    }
}
