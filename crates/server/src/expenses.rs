//! Expense API endpoints

use api_types::expense::{ExpenseNew, ExpenseUpdate, ExpenseView, ExpensesResponse, SplitView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn expense_view(expense: engine::StoredExpense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        group_id: expense.group_id,
        amount: expense.amount,
        description: expense.description,
        paid_by_id: expense.paid_by_id,
        paid_by_name: expense.paid_by_name,
        split_members: expense
            .splits
            .into_iter()
            .map(|split| SplitView {
                member_id: split.member_id,
                member_name: split.member_name,
                amount: split.amount,
            })
            .collect(),
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

/// Handle requests for recording a new expense.
pub async fn create(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .add_expense(
            group_id,
            payload.amount,
            &payload.description,
            payload.paid_by_id,
            &payload.split_member_ids,
        )
        .await?;

    Ok(Json(expense_view(expense)))
}

/// Handle requests for listing a group's expenses, newest first.
pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(group_id)
        .await?
        .into_iter()
        .map(expense_view)
        .collect();

    Ok(Json(ExpensesResponse { expenses }))
}

/// Handle requests for replacing an expense's amount, payer and split.
pub async fn update(
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .update_expense(
            group_id,
            expense_id,
            payload.amount,
            &payload.description,
            payload.paid_by_id,
            &payload.split_member_ids,
        )
        .await?;

    Ok(Json(expense_view(expense)))
}

/// Handle requests for deleting an expense.
pub async fn remove(
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(group_id, expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
