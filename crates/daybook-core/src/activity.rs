//! Append-only activity feed.
//!
//! Mutating operations on tasks, notes and ledger rows record a row here
//! describing what happened, for the recent-activity panel. Rows are never
//! edited after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How many rows the recent-activity feed returns.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Which part of the app an activity row came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Task,
    Note,
    Habit,
    Expense,
    /// Account registration in the ledger.
    Account,
}

/// One entry in the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Source area of the app
    pub kind: ActivityKind,
    /// What happened, e.g. "created", "pinned", "added income"
    pub action: String,
    /// Human-readable detail line
    pub details: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Build a feed entry.
    pub fn new(
        user_id: impl Into<String>,
        kind: ActivityKind,
        action: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Activity {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            kind,
            action: action.into(),
            details: details.into(),
            created_at: Utc::now(),
        }
    }
}
