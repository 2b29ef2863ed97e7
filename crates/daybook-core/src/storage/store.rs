//! SQLite-based storage for users, habits, tasks, notes, expenses and the
//! activity feed.
//!
//! All timestamps are stored as RFC3339 TEXT, which also makes lexicographic
//! ordering chronological. Every query that touches user data is scoped by
//! `user_id`; a row owned by another user behaves exactly like a missing row.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::migrations;
use crate::activity::{Activity, ActivityKind};
use crate::error::StorageError;
use crate::expense::{Expense, ExpenseFlow};
use crate::habit::{Habit, HabitFrequency, HabitKind};
use crate::note::Note;
use crate::task::{Task, TaskPriority};
use crate::user::User;

// === Helper Functions ===

/// Parse habit frequency from database string
fn parse_frequency(frequency_str: &str) -> HabitFrequency {
    match frequency_str {
        "Weekly" => HabitFrequency::Weekly,
        "Monthly" => HabitFrequency::Monthly,
        _ => HabitFrequency::Daily,
    }
}

/// Format habit frequency for database storage
fn format_frequency(frequency: HabitFrequency) -> &'static str {
    match frequency {
        HabitFrequency::Daily => "Daily",
        HabitFrequency::Weekly => "Weekly",
        HabitFrequency::Monthly => "Monthly",
    }
}

/// Parse habit kind from database string
fn parse_habit_kind(kind_str: &str) -> HabitKind {
    match kind_str {
        "counter" => HabitKind::Counter,
        _ => HabitKind::Binary,
    }
}

/// Format habit kind for database storage
fn format_habit_kind(kind: HabitKind) -> &'static str {
    match kind {
        HabitKind::Binary => "binary",
        HabitKind::Counter => "counter",
    }
}

/// Parse task priority from database string
fn parse_priority(priority_str: &str) -> TaskPriority {
    match priority_str {
        "Medium" => TaskPriority::Medium,
        "High" => TaskPriority::High,
        _ => TaskPriority::Low,
    }
}

/// Format task priority for database storage
fn format_priority(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "Low",
        TaskPriority::Medium => "Medium",
        TaskPriority::High => "High",
    }
}

/// Parse money flow from database string
fn parse_flow(flow_str: &str) -> ExpenseFlow {
    match flow_str {
        "income" => ExpenseFlow::Income,
        _ => ExpenseFlow::Expense,
    }
}

/// Format money flow for database storage
fn format_flow(flow: ExpenseFlow) -> &'static str {
    match flow {
        ExpenseFlow::Income => "income",
        ExpenseFlow::Expense => "expense",
    }
}

/// Parse activity kind from database string
fn parse_activity_kind(kind_str: &str) -> ActivityKind {
    match kind_str {
        "note" => ActivityKind::Note,
        "habit" => ActivityKind::Habit,
        "expense" => ActivityKind::Expense,
        "account" => ActivityKind::Account,
        _ => ActivityKind::Task,
    }
}

/// Format activity kind for database storage
fn format_activity_kind(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Task => "task",
        ActivityKind::Note => "note",
        ActivityKind::Habit => "habit",
        ActivityKind::Expense => "expense",
        ActivityKind::Account => "account",
    }
}

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Parse an optional datetime column; unparseable values read as absent
fn parse_datetime_opt(dt_str: Option<String>) -> Option<DateTime<Utc>> {
    dt_str
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Build a Habit from a database row
fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
    let frequency_str: String = row.get(4)?;
    let kind_str: String = row.get(5)?;
    let last_completed_at_str: Option<String> = row.get(10)?;
    let created_at_str: String = row.get(12)?;

    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        frequency: parse_frequency(&frequency_str),
        kind: parse_habit_kind(&kind_str),
        daily_target: row.get(6)?,
        progress: row.get(7)?,
        completed: row.get(8)?,
        streak: row.get(9)?,
        last_completed_at: parse_datetime_opt(last_completed_at_str),
        pinned: row.get(11)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let priority_str: String = row.get(4)?;
    let due_date_str: Option<String> = row.get(5)?;
    let created_at_str: String = row.get(8)?;
    let updated_at_str: String = row.get(9)?;

    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        priority: parse_priority(&priority_str),
        due_date: parse_datetime_opt(due_date_str),
        pinned: row.get(6)?,
        completed: row.get(7)?,
        created_at: parse_datetime_fallback(&created_at_str),
        updated_at: parse_datetime_fallback(&updated_at_str),
    })
}

/// Build a Note from a database row
fn row_to_note(row: &rusqlite::Row) -> Result<Note, rusqlite::Error> {
    let created_at_str: String = row.get(5)?;

    Ok(Note {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        pinned: row.get(4)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// Build an Expense from a database row
fn row_to_expense(row: &rusqlite::Row) -> Result<Expense, rusqlite::Error> {
    let flow_str: String = row.get(4)?;
    let date_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        amount: row.get(3)?,
        flow: parse_flow(&flow_str),
        category: row.get(5)?,
        account_name: row.get(6)?,
        date: parse_datetime_fallback(&date_str),
        created_at: parse_datetime_fallback(&created_at_str),
        account_only: row.get(9)?,
    })
}

/// Build an Activity from a database row
fn row_to_activity(row: &rusqlite::Row) -> Result<Activity, rusqlite::Error> {
    let kind_str: String = row.get(2)?;
    let created_at_str: String = row.get(5)?;

    Ok(Activity {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: parse_activity_kind(&kind_str),
        action: row.get(3)?,
        details: row.get(4)?,
        created_at: parse_datetime_fallback(&created_at_str),
    })
}

/// SQLite database holding all per-user records.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database at `path`, creating the file and schema as needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let store = Self { conn };
        store
            .migrate()
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|source| StorageError::OpenFailed {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        let store = Self { conn };
        store
            .migrate()
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        // Create base tables (v1 schema) first
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id            TEXT PRIMARY KEY,
                name          TEXT NOT NULL,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at    TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS habits (
                id                TEXT PRIMARY KEY,
                user_id           TEXT NOT NULL,
                title             TEXT NOT NULL,
                description       TEXT NOT NULL,
                frequency         TEXT NOT NULL DEFAULT 'Daily',
                kind              TEXT NOT NULL DEFAULT 'binary',
                daily_target      INTEGER NOT NULL DEFAULT 1,
                progress          INTEGER NOT NULL DEFAULT 0,
                completed         INTEGER NOT NULL DEFAULT 0,
                streak            INTEGER NOT NULL DEFAULT 0,
                last_completed_at TEXT,
                pinned            INTEGER NOT NULL DEFAULT 0,
                created_at        TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                title       TEXT NOT NULL,
                description TEXT NOT NULL,
                priority    TEXT NOT NULL DEFAULT 'Low',
                due_date    TEXT,
                pinned      INTEGER NOT NULL DEFAULT 0,
                completed   INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id         TEXT PRIMARY KEY,
                user_id    TEXT NOT NULL,
                title      TEXT NOT NULL,
                content    TEXT NOT NULL,
                pinned     INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS expenses (
                id           TEXT PRIMARY KEY,
                user_id      TEXT NOT NULL,
                title        TEXT,
                amount       REAL,
                flow         TEXT NOT NULL DEFAULT 'expense',
                category     TEXT,
                account_name TEXT NOT NULL DEFAULT 'Cash',
                date         TEXT NOT NULL,
                created_at   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activities (
                id         TEXT PRIMARY KEY,
                user_id    TEXT NOT NULL,
                kind       TEXT NOT NULL,
                action     TEXT NOT NULL,
                details    TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            -- Create indexes for common query patterns
            CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id);
            CREATE INDEX IF NOT EXISTS idx_notes_user ON notes(user_id);
            CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user_id);
            CREATE INDEX IF NOT EXISTS idx_activities_user_created
                ON activities(user_id, created_at);",
        )?;

        // Run incremental migrations (v1 -> v2, etc.)
        migrations::migrate(&self.conn)?;

        Ok(())
    }

    // === User CRUD ===

    /// Insert a new user.
    pub fn insert_user(&self, user: &User) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.name,
                user.email,
                user.password_hash,
                user.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up a user by exact email.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, password_hash, created_at
             FROM users WHERE email = ?1",
        )?;
        stmt.query_row(params![email], |row| {
            let created_at_str: String = row.get(4)?;
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                created_at: parse_datetime_fallback(&created_at_str),
            })
        })
        .optional()
    }

    // === Habit CRUD ===

    /// Insert a new habit.
    pub fn insert_habit(&self, habit: &Habit) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO habits (
                id, user_id, title, description, frequency, kind, daily_target,
                progress, completed, streak, last_completed_at, pinned, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                habit.id,
                habit.user_id,
                habit.title,
                habit.description,
                format_frequency(habit.frequency),
                format_habit_kind(habit.kind),
                habit.daily_target,
                habit.progress,
                habit.completed,
                habit.streak,
                habit.last_completed_at.map(|dt| dt.to_rfc3339()),
                habit.pinned,
                habit.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List a user's habits, oldest first.
    pub fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, frequency, kind, daily_target,
                    progress, completed, streak, last_completed_at, pinned, created_at
             FROM habits WHERE user_id = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| row_to_habit(row))?;
        rows.collect()
    }

    /// Get one of a user's habits by id.
    pub fn get_habit(&self, user_id: &str, id: &str) -> Result<Option<Habit>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, frequency, kind, daily_target,
                    progress, completed, streak, last_completed_at, pinned, created_at
             FROM habits WHERE id = ?1 AND user_id = ?2",
        )?;
        stmt.query_row(params![id, user_id], |row| row_to_habit(row))
            .optional()
    }

    /// Persist the mutable fields of a habit.
    pub fn update_habit(&self, habit: &Habit) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE habits
             SET title = ?1, description = ?2, frequency = ?3, daily_target = ?4,
                 progress = ?5, completed = ?6, streak = ?7, last_completed_at = ?8,
                 pinned = ?9
             WHERE id = ?10 AND user_id = ?11",
            params![
                habit.title,
                habit.description,
                format_frequency(habit.frequency),
                habit.daily_target,
                habit.progress,
                habit.completed,
                habit.streak,
                habit.last_completed_at.map(|dt| dt.to_rfc3339()),
                habit.pinned,
                habit.id,
                habit.user_id,
            ],
        )?;
        Ok(())
    }

    /// Delete one of a user's habits. Returns whether a row was removed.
    pub fn delete_habit(&self, user_id: &str, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }

    // === Task CRUD ===

    /// Insert a new task.
    pub fn insert_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO tasks (
                id, user_id, title, description, priority, due_date, pinned,
                completed, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                task.id,
                task.user_id,
                task.title,
                task.description,
                format_priority(task.priority),
                task.due_date.map(|dt| dt.to_rfc3339()),
                task.pinned,
                task.completed,
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List a user's tasks, newest first.
    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, priority, due_date, pinned,
                    completed, created_at, updated_at
             FROM tasks WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| row_to_task(row))?;
        rows.collect()
    }

    /// Get one of a user's tasks by id.
    pub fn get_task(&self, user_id: &str, id: &str) -> Result<Option<Task>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, priority, due_date, pinned,
                    completed, created_at, updated_at
             FROM tasks WHERE id = ?1 AND user_id = ?2",
        )?;
        stmt.query_row(params![id, user_id], |row| row_to_task(row))
            .optional()
    }

    /// Persist the mutable fields of a task.
    pub fn update_task(&self, task: &Task) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE tasks
             SET title = ?1, description = ?2, priority = ?3, due_date = ?4,
                 pinned = ?5, completed = ?6, updated_at = ?7
             WHERE id = ?8 AND user_id = ?9",
            params![
                task.title,
                task.description,
                format_priority(task.priority),
                task.due_date.map(|dt| dt.to_rfc3339()),
                task.pinned,
                task.completed,
                task.updated_at.to_rfc3339(),
                task.id,
                task.user_id,
            ],
        )?;
        Ok(())
    }

    /// Delete one of a user's tasks. Returns whether a row was removed.
    pub fn delete_task(&self, user_id: &str, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }

    // === Note CRUD ===

    /// Insert a new note.
    pub fn insert_note(&self, note: &Note) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO notes (id, user_id, title, content, pinned, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                note.id,
                note.user_id,
                note.title,
                note.content,
                note.pinned,
                note.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List a user's notes, newest first.
    pub fn list_notes(&self, user_id: &str) -> Result<Vec<Note>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, content, pinned, created_at
             FROM notes WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| row_to_note(row))?;
        rows.collect()
    }

    /// Get one of a user's notes by id.
    pub fn get_note(&self, user_id: &str, id: &str) -> Result<Option<Note>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, content, pinned, created_at
             FROM notes WHERE id = ?1 AND user_id = ?2",
        )?;
        stmt.query_row(params![id, user_id], |row| row_to_note(row))
            .optional()
    }

    /// Persist the mutable fields of a note.
    pub fn update_note(&self, note: &Note) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE notes SET title = ?1, content = ?2, pinned = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![note.title, note.content, note.pinned, note.id, note.user_id],
        )?;
        Ok(())
    }

    /// Delete one of a user's notes. Returns whether a row was removed.
    pub fn delete_note(&self, user_id: &str, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }

    // === Expense CRUD ===

    /// Insert a new ledger row.
    pub fn insert_expense(&self, expense: &Expense) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO expenses (
                id, user_id, title, amount, flow, category, account_name,
                date, created_at, account_only
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                expense.id,
                expense.user_id,
                expense.title,
                expense.amount,
                format_flow(expense.flow),
                expense.category,
                expense.account_name,
                expense.date.to_rfc3339(),
                expense.created_at.to_rfc3339(),
                expense.account_only,
            ],
        )?;
        Ok(())
    }

    /// List a user's ledger rows, newest transaction date first.
    pub fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, amount, flow, category, account_name,
                    date, created_at, account_only
             FROM expenses WHERE user_id = ?1 ORDER BY date DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| row_to_expense(row))?;
        rows.collect()
    }

    /// Get one of a user's ledger rows by id.
    pub fn get_expense(&self, user_id: &str, id: &str) -> Result<Option<Expense>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, amount, flow, category, account_name,
                    date, created_at, account_only
             FROM expenses WHERE id = ?1 AND user_id = ?2",
        )?;
        stmt.query_row(params![id, user_id], |row| row_to_expense(row))
            .optional()
    }

    /// Persist the mutable fields of a ledger row.
    pub fn update_expense(&self, expense: &Expense) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "UPDATE expenses
             SET title = ?1, amount = ?2, flow = ?3, category = ?4,
                 account_name = ?5, date = ?6
             WHERE id = ?7 AND user_id = ?8",
            params![
                expense.title,
                expense.amount,
                format_flow(expense.flow),
                expense.category,
                expense.account_name,
                expense.date.to_rfc3339(),
                expense.id,
                expense.user_id,
            ],
        )?;
        Ok(())
    }

    /// Delete one of a user's ledger rows. Returns whether a row was removed.
    pub fn delete_expense(&self, user_id: &str, id: &str) -> Result<bool, rusqlite::Error> {
        let changed = self.conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }

    /// Distinct account names across all of a user's ledger rows.
    pub fn list_account_names(&self, user_id: &str) -> Result<Vec<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT account_name FROM expenses
             WHERE user_id = ?1 ORDER BY account_name ASC",
        )?;
        let mut rows = stmt.query(params![user_id])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get(0)?);
        }
        Ok(names)
    }

    /// Whether the user already registered `name` as an account-only row.
    pub fn has_account_row(&self, user_id: &str, name: &str) -> Result<bool, rusqlite::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM expenses
             WHERE user_id = ?1 AND account_name = ?2 AND account_only = 1",
            params![user_id, name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // === Activity feed ===

    /// Append an activity row.
    pub fn insert_activity(&self, activity: &Activity) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO activities (id, user_id, kind, action, details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                activity.id,
                activity.user_id,
                format_activity_kind(activity.kind),
                activity.action,
                activity.details,
                activity.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List a user's activity rows, newest first, optionally limited.
    pub fn list_activities(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Activity>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, kind, action, details, created_at
             FROM activities WHERE user_id = ?1
             ORDER BY created_at DESC
             LIMIT ?2",
        )?;
        // SQLite treats a negative LIMIT as no limit.
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let rows = stmt.query_map(params![user_id, limit], |row| row_to_activity(row))?;
        rows.collect()
    }
}
