//! Note records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Creation payload for a note.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

/// Field-level edit payload for a note. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A per-user free-text note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Note title
    pub title: String,
    /// Note body
    pub content: String,
    /// Display-only pin flag
    pub pinned: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Validate a creation payload and build the initial record.
    ///
    /// # Errors
    /// Rejects empty titles and bodies.
    pub fn new(user_id: impl Into<String>, input: NewNote) -> Result<Self, ValidationError> {
        if input.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if input.content.trim().is_empty() {
            return Err(ValidationError::MissingField("content"));
        }

        Ok(Note {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: input.title,
            content: input.content,
            pinned: false,
            created_at: Utc::now(),
        })
    }

    /// Apply a field-level edit.
    ///
    /// # Errors
    /// Rejects empty replacement titles or bodies.
    pub fn apply_update(&mut self, update: NoteUpdate) -> Result<(), ValidationError> {
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(ValidationError::MissingField("title"));
            }
            self.title = title;
        }
        if let Some(content) = update.content {
            if content.trim().is_empty() {
                return Err(ValidationError::MissingField("content"));
            }
            self.content = content;
        }
        Ok(())
    }

    /// Flip the pin flag.
    pub fn toggle_pinned(&mut self) {
        self.pinned = !self.pinned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_note() -> Note {
        Note::new(
            "user-1",
            NewNote {
                title: "Groceries".to_string(),
                content: "Milk, eggs".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn creation_defaults() {
        let note = make_note();
        assert!(!note.pinned);
        assert_eq!(note.title, "Groceries");
    }

    #[test]
    fn creation_rejects_blank_content() {
        let result = Note::new(
            "user-1",
            NewNote {
                title: "Groceries".to_string(),
                content: "  ".to_string(),
            },
        );
        assert!(matches!(
            result,
            Err(ValidationError::MissingField("content"))
        ));
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let mut note = make_note();
        note.apply_update(NoteUpdate {
            title: None,
            content: Some("Milk, eggs, bread".to_string()),
        })
        .unwrap();

        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "Milk, eggs, bread");
    }

    #[test]
    fn toggle_pinned_flips_the_flag() {
        let mut note = make_note();
        note.toggle_pinned();
        assert!(note.pinned);
        note.toggle_pinned();
        assert!(!note.pinned);
    }
}
