//! # Daybook Core Library
//!
//! Core business logic for the daybook productivity backend: record types,
//! the habit state engine, authentication primitives, SQLite persistence and
//! the dashboard aggregation. The HTTP server in `daybook-server` is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Habit Engine**: pure state transitions over an injected clock; the
//!   caller decides what "now" is and persists the result
//! - **Records**: tasks, notes, expenses and the activity feed are plain
//!   field-level CRUD with validation at construction time
//! - **Storage**: one SQLite database holding every user's records, with
//!   versioned migrations
//! - **Auth**: Argon2id password hashing and HMAC-signed bearer tokens
//!
//! ## Key Components
//!
//! - [`Habit`]: habit record plus its completion, undo and normalization engine
//! - [`Store`]: SQLite persistence for all record types
//! - [`dashboard::build_summary`]: the cross-section dashboard aggregate

pub mod habit;
pub mod task;
pub mod note;
pub mod expense;
pub mod activity;
pub mod dashboard;
pub mod auth;
pub mod user;
pub mod storage;
pub mod error;

// Store methods surface rusqlite errors directly; re-export the crate so
// callers can name them without pinning their own copy.
pub use rusqlite;

pub use habit::{Habit, HabitFrequency, HabitKind, HabitUpdate, NewHabit};
pub use task::{NewTask, Task, TaskPriority, TaskUpdate};
pub use note::{NewNote, Note, NoteUpdate};
pub use expense::{
    summarize_by_account, AccountSummary, Expense, ExpenseFlow, ExpenseUpdate, NewExpense,
};
pub use activity::{Activity, ActivityKind, RECENT_ACTIVITY_LIMIT};
pub use dashboard::DashboardSummary;
pub use auth::{AuthResponse, LoginRequest, SignupRequest};
pub use user::User;
pub use storage::Store;
pub use error::{AuthError, CoreError, Result, StorageError, ValidationError};
