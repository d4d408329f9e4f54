use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    Extension, Json,
};
use axum::http::StatusCode;
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::models::{CreateExpenseInput, Expense, UpdateExpenseInput};
use crate::routes::{json_body, AppState};

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub expense: Expense,
}

#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
}

fn expense_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::validation("invalid expense ID"))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<CreateExpenseInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ExpenseResponse>)> {
    let input = json_body(body)?;
    let expense = state.expenses.create_expense(user.id(), input)?;
    tracing::debug!(expense_id = expense.id, "expense created");

    Ok((StatusCode::CREATED, Json(ExpenseResponse { expense })))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<ExpenseListResponse>> {
    let expenses = state.expenses.list_expenses(user.id())?;
    Ok(Json(ExpenseListResponse { expenses }))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateExpenseInput>, JsonRejection>,
) -> AppResult<Json<ExpenseResponse>> {
    let id = expense_id(path)?;
    let input = UpdateExpenseInput {
        id,
        ..json_body(body)?
    };

    let expense = state.expenses.update_expense(user.id(), input)?;
    Ok(Json(ExpenseResponse { expense }))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = expense_id(path)?;
    state.expenses.delete_expense(user.id(), id)?;

    Ok(StatusCode::NO_CONTENT)
}
