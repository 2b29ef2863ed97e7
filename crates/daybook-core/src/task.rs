//! Task records for the todo board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ValidationError;

/// Display priority of a task.
///
/// Serde tokens are capitalized (`"Low"`) to match the stored wire values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Low
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "Low"),
            TaskPriority::Medium => write!(f, "Medium"),
            TaskPriority::High => write!(f, "High"),
        }
    }
}

/// Creation payload for a task.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Field-level edit payload for a task. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
}

/// A per-user todo item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Task title
    pub title: String,
    /// Task description
    pub description: String,
    /// Display priority
    pub priority: TaskPriority,
    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
    /// Display-only pin flag
    pub pinned: bool,
    /// Whether the task is done
    pub completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Validate a creation payload and build the initial record.
    ///
    /// # Errors
    /// Rejects empty titles and descriptions.
    pub fn new(user_id: impl Into<String>, input: NewTask) -> Result<Self, ValidationError> {
        if input.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if input.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }

        let now = Utc::now();
        Ok(Task {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: input.title,
            description: input.description,
            priority: input.priority,
            due_date: input.due_date,
            pinned: false,
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a field-level edit.
    ///
    /// # Errors
    /// Rejects empty replacement titles or descriptions.
    pub fn apply_update(&mut self, update: TaskUpdate) -> Result<(), ValidationError> {
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(ValidationError::MissingField("title"));
            }
            self.title = title;
        }
        if let Some(description) = update.description {
            if description.trim().is_empty() {
                return Err(ValidationError::MissingField("description"));
            }
            self.description = description;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Flip the pin flag.
    pub fn toggle_pinned(&mut self) {
        self.pinned = !self.pinned;
        self.updated_at = Utc::now();
    }

    /// Flip the completion flag.
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task() -> Task {
        Task::new(
            "user-1",
            NewTask {
                title: "Write report".to_string(),
                description: "Quarterly numbers".to_string(),
                priority: TaskPriority::High,
                due_date: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn creation_defaults() {
        let task = make_task();
        assert!(!task.completed);
        assert!(!task.pinned);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn priority_default_is_low() {
        assert_eq!(TaskPriority::default(), TaskPriority::Low);
    }

    #[test]
    fn priority_tokens_are_capitalized() {
        assert_eq!(
            serde_json::to_string(&TaskPriority::Medium).unwrap(),
            "\"Medium\""
        );
        let decoded: TaskPriority = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(decoded, TaskPriority::High);
        assert_eq!(TaskPriority::Low.to_string(), "Low");
    }

    #[test]
    fn creation_rejects_blank_title() {
        let result = Task::new(
            "user-1",
            NewTask {
                title: "".to_string(),
                description: "desc".to_string(),
                priority: TaskPriority::Low,
                due_date: None,
            },
        );
        assert!(matches!(
            result,
            Err(ValidationError::MissingField("title"))
        ));
    }

    #[test]
    fn update_changes_only_provided_fields() {
        let mut task = make_task();
        task.apply_update(TaskUpdate {
            title: Some("Send report".to_string()),
            description: None,
            priority: None,
            due_date: None,
        })
        .unwrap();

        assert_eq!(task.title, "Send report");
        assert_eq!(task.description, "Quarterly numbers");
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn toggles_flip_back_and_forth() {
        let mut task = make_task();

        task.toggle_completed();
        assert!(task.completed);
        task.toggle_completed();
        assert!(!task.completed);

        task.toggle_pinned();
        assert!(task.pinned);
        task.toggle_pinned();
        assert!(!task.pinned);
    }
}
