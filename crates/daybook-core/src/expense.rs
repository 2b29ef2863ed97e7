//! Money ledger records and per-account aggregation.
//!
//! The ledger stores two kinds of rows: real transactions (income or
//! expense) and account-only rows, which exist purely to register an
//! account name before any money moves through it. Account-only rows carry
//! no title or amount and count as zero in every aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::error::ValidationError;

/// Direction of money movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseFlow {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl Default for ExpenseFlow {
    fn default() -> Self {
        ExpenseFlow::Expense
    }
}

impl fmt::Display for ExpenseFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseFlow::Income => write!(f, "income"),
            ExpenseFlow::Expense => write!(f, "expense"),
        }
    }
}

/// Creation payload for a ledger transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub title: Option<String>,
    pub amount: Option<f64>,
    #[serde(default)]
    pub flow: ExpenseFlow,
    pub category: Option<String>,
    pub account_name: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Field-level edit payload for a ledger row. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseUpdate {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub flow: Option<ExpenseFlow>,
    pub category: Option<String>,
    pub account_name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// A per-user ledger row.
///
/// `title`, `amount` and `category` are absent on account-only rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Transaction title; absent on account-only rows
    pub title: Option<String>,
    /// Transaction amount; absent on account-only rows
    pub amount: Option<f64>,
    /// Direction of money movement
    pub flow: ExpenseFlow,
    /// Free-form category label
    pub category: Option<String>,
    /// Account the row belongs to
    pub account_name: String,
    /// Transaction date
    pub date: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Marks a row that registers an account without a transaction
    pub account_only: bool,
}

impl Expense {
    /// Validate a creation payload and build a transaction row.
    ///
    /// # Errors
    /// Rejects payloads missing a title, a non-zero amount, a category or
    /// an account name.
    pub fn new(user_id: impl Into<String>, input: NewExpense) -> Result<Self, ValidationError> {
        let title = match input.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(ValidationError::IncompleteExpense),
        };
        let amount = match input.amount {
            Some(amount) if amount != 0.0 => amount,
            _ => return Err(ValidationError::IncompleteExpense),
        };
        let category = match input.category {
            Some(category) if !category.trim().is_empty() => category,
            _ => return Err(ValidationError::IncompleteExpense),
        };
        let account_name = match input.account_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(ValidationError::IncompleteExpense),
        };

        let now = Utc::now();
        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: Some(title),
            amount: Some(amount),
            flow: input.flow,
            category: Some(category),
            account_name,
            date: input.date.unwrap_or(now),
            created_at: now,
            account_only: false,
        })
    }

    /// Build an account-only row registering `name` for the user.
    ///
    /// # Errors
    /// Rejects empty account names.
    pub fn new_account(
        user_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }

        let now = Utc::now();
        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title: None,
            amount: None,
            flow: ExpenseFlow::Expense,
            category: None,
            account_name: name,
            date: now,
            created_at: now,
            account_only: true,
        })
    }

    /// Apply a field-level edit. Edits carry no validation; an account-only
    /// row edited into a transaction is the caller's business.
    pub fn apply_update(&mut self, update: ExpenseUpdate) {
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(amount) = update.amount {
            self.amount = Some(amount);
        }
        if let Some(flow) = update.flow {
            self.flow = flow;
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(account_name) = update.account_name {
            self.account_name = account_name;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
    }
}

/// Income, expense and balance totals for one account.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct AccountSummary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Fold ledger rows into per-account totals.
///
/// Every row contributes to its account, account-only rows as zero, so a
/// freshly registered account shows up with an all-zero summary.
pub fn summarize_by_account(expenses: &[Expense]) -> BTreeMap<String, AccountSummary> {
    let mut accounts: BTreeMap<String, AccountSummary> = BTreeMap::new();

    for expense in expenses {
        let entry = accounts.entry(expense.account_name.clone()).or_default();
        let amount = expense.amount.unwrap_or(0.0);
        match expense.flow {
            ExpenseFlow::Income => entry.income += amount,
            ExpenseFlow::Expense => entry.expense += amount,
        }
        entry.balance = entry.income - entry.expense;
    }

    accounts
}
