//! Ledger endpoints: expense CRUD, per-account summary, and account
//! registration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;

use daybook_core::activity::{Activity, ActivityKind};
use daybook_core::expense::{
    summarize_by_account, AccountSummary, Expense, ExpenseFlow, ExpenseUpdate, NewExpense,
};

use crate::error::ApiError;
use crate::extract::{CurrentUser, Json};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/summary", get(summary))
        .route("/accounts", get(accounts).post(create_account))
        .route("/{id}", axum::routing::put(update).delete(remove))
}

/// `"<title> - ₹<amount>"`, the feed line for a ledger row.
fn detail_line(expense: &Expense) -> String {
    format!(
        "{} - ₹{}",
        expense.title.as_deref().unwrap_or(""),
        expense.amount.unwrap_or(0.0)
    )
}

async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let store = state.store()?;
    Ok(Json(store.list_expenses(&user_id)?))
}

async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<NewExpense>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = Expense::new(&user_id, input)?;
    let store = state.store()?;
    store.insert_expense(&expense)?;

    let action = match expense.flow {
        ExpenseFlow::Income => "added income",
        ExpenseFlow::Expense => "added expense",
    };
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Expense,
        action,
        format!("{} ({})", detail_line(&expense), expense.account_name),
    ))?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Partial update. No field validation here: omitted fields stay, supplied
/// fields replace.
async fn update(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, ApiError> {
    let store = state.store()?;
    let mut expense = store
        .get_expense(&user_id, &id)?
        .ok_or(ApiError::NotFound("Expense"))?;
    expense.apply_update(input);
    store.update_expense(&expense)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Expense,
        "updated",
        detail_line(&expense),
    ))?;
    Ok(Json(expense))
}

async fn remove(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = state.store()?;
    let expense = store
        .get_expense(&user_id, &id)?
        .ok_or(ApiError::NotFound("Expense"))?;
    store.delete_expense(&user_id, &id)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Expense,
        "deleted",
        detail_line(&expense),
    ))?;
    Ok(Json(json!({ "message": "Deleted successfully" })))
}

/// Income, expense and balance per account name.
async fn summary(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<BTreeMap<String, AccountSummary>>, ApiError> {
    let store = state.store()?;
    let expenses = store.list_expenses(&user_id)?;
    Ok(Json(summarize_by_account(&expenses)))
}

/// Distinct account names across all ledger rows.
async fn accounts(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<String>>, ApiError> {
    let store = state.store()?;
    Ok(Json(store.list_account_names(&user_id)?))
}

#[derive(Debug, Deserialize)]
struct AccountPayload {
    name: String,
}

/// Register an account without a transaction. Idempotent on the name.
async fn create_account(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<AccountPayload>,
) -> Result<Response, ApiError> {
    let store = state.store()?;
    if store.has_account_row(&user_id, &payload.name)? {
        return Ok(Json(json!({ "message": "Account already exists" })).into_response());
    }

    let account = Expense::new_account(&user_id, &payload.name)?;
    store.insert_expense(&account)?;
    store.insert_activity(&Activity::new(
        &user_id,
        ActivityKind::Account,
        "added",
        payload.name,
    ))?;
    Ok((StatusCode::CREATED, Json(account)).into_response())
}
