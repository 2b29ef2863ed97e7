//! Counters for the dashboard landing screen.
//!
//! Pure folds over already-loaded records. Habit counters assume the caller
//! normalized the habits for the current time first, otherwise
//! `completed_today` can report a finished period that already rolled over.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::expense::{AccountSummary, Expense, ExpenseFlow};
use crate::habit::Habit;
use crate::note::Note;
use crate::task::Task;

/// Task counters.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Note counters.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct NoteSummary {
    pub total: usize,
    pub pinned: usize,
    /// Creation time of the newest note, if any.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Habit counters for the current period.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct HabitSummary {
    pub total: usize,
    pub completed_today: usize,
    pub pending: usize,
    /// Highest current streak across all habits.
    pub best_streak: u32,
}

/// Aggregate counters across all record types.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub tasks: TaskSummary,
    pub expenses: AccountSummary,
    pub notes: NoteSummary,
    pub habits: HabitSummary,
}

/// Fold current records into the dashboard aggregate.
pub fn build_summary(
    tasks: &[Task],
    expenses: &[Expense],
    notes: &[Note],
    habits: &[Habit],
) -> DashboardSummary {
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();
    let task_summary = TaskSummary {
        total: tasks.len(),
        completed: completed_tasks,
        pending: tasks.len() - completed_tasks,
    };

    // Account-only rows have no amount and count as zero.
    let mut money = AccountSummary::default();
    for expense in expenses {
        let amount = expense.amount.unwrap_or(0.0);
        match expense.flow {
            ExpenseFlow::Income => money.income += amount,
            ExpenseFlow::Expense => money.expense += amount,
        }
    }
    money.balance = money.income - money.expense;

    let note_summary = NoteSummary {
        total: notes.len(),
        pinned: notes.iter().filter(|n| n.pinned).count(),
        last_updated: notes.iter().map(|n| n.created_at).max(),
    };

    let completed_today = habits.iter().filter(|h| h.completed).count();
    let habit_summary = HabitSummary {
        total: habits.len(),
        completed_today,
        pending: habits.len() - completed_today,
        best_streak: habits.iter().map(|h| h.streak).max().unwrap_or(0),
    };

    DashboardSummary {
        tasks: task_summary,
        expenses: money,
        notes: note_summary,
        habits: habit_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::NewExpense;
    use crate::habit::{HabitFrequency, HabitKind, NewHabit};
    use crate::note::NewNote;
    use crate::task::{NewTask, TaskPriority};
    use chrono::TimeZone;

    fn make_task(completed: bool) -> Task {
        let mut task = Task::new(
            "user-1",
            NewTask {
                title: "Task".to_string(),
                description: "d".to_string(),
                priority: TaskPriority::Low,
                due_date: None,
            },
        )
        .unwrap();
        if completed {
            task.toggle_completed();
        }
        task
    }

    fn make_note(pinned: bool) -> Note {
        let mut note = Note::new(
            "user-1",
            NewNote {
                title: "Note".to_string(),
                content: "c".to_string(),
            },
        )
        .unwrap();
        if pinned {
            note.toggle_pinned();
        }
        note
    }

    fn make_expense(flow: ExpenseFlow, amount: f64) -> Expense {
        Expense::new(
            "user-1",
            NewExpense {
                title: Some("Entry".to_string()),
                amount: Some(amount),
                flow,
                category: Some("General".to_string()),
                account_name: Some("Cash".to_string()),
                date: None,
            },
        )
        .unwrap()
    }

    fn make_habit(streak: u32, completed: bool) -> Habit {
        let mut habit = Habit::new(
            "user-1",
            NewHabit {
                title: "Habit".to_string(),
                description: "d".to_string(),
                frequency: HabitFrequency::Daily,
                kind: HabitKind::Binary,
                daily_target: None,
            },
        )
        .unwrap();
        habit.streak = streak;
        habit.completed = completed;
        habit
    }

    #[test]
    fn empty_records_fold_to_zero() {
        let summary = build_summary(&[], &[], &[], &[]);
        assert_eq!(summary, DashboardSummary::default());
        assert!(summary.notes.last_updated.is_none());
    }

    #[test]
    fn counts_split_completed_and_pending() {
        let tasks = vec![make_task(true), make_task(true), make_task(false)];
        let habits = vec![make_habit(4, true), make_habit(9, false)];

        let summary = build_summary(&tasks, &[], &[], &habits);
        assert_eq!(summary.tasks.total, 3);
        assert_eq!(summary.tasks.completed, 2);
        assert_eq!(summary.tasks.pending, 1);
        assert_eq!(summary.habits.completed_today, 1);
        assert_eq!(summary.habits.pending, 1);
        assert_eq!(summary.habits.best_streak, 9);
    }

    #[test]
    fn money_folds_across_accounts() {
        let expenses = vec![
            make_expense(ExpenseFlow::Income, 1000.0),
            make_expense(ExpenseFlow::Expense, 300.0),
            make_expense(ExpenseFlow::Expense, 120.0),
            Expense::new_account("user-1", "Savings").unwrap(),
        ];

        let summary = build_summary(&[], &expenses, &[], &[]);
        assert_eq!(summary.expenses.income, 1000.0);
        assert_eq!(summary.expenses.expense, 420.0);
        assert_eq!(summary.expenses.balance, 580.0);
    }

    #[test]
    fn newest_note_wins_last_updated() {
        let mut old = make_note(false);
        old.created_at = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let mut new = make_note(true);
        new.created_at = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();

        let summary = build_summary(&[], &[], &[old, new.clone()], &[]);
        assert_eq!(summary.notes.total, 2);
        assert_eq!(summary.notes.pinned, 1);
        assert_eq!(summary.notes.last_updated, Some(new.created_at));
    }
}
