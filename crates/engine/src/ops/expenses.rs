use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ExpenseSplit, ResultEngine, StoredExpense, expense_splits, expenses,
    settlement::split_amounts, validate,
};

use super::{Engine, with_tx};

impl Engine {
    /// Records a new expense and materializes its per-member shares.
    ///
    /// The payer and every split member must belong to the group; rejecting
    /// dangling references here is what keeps stored ledgers zero-sum.
    pub async fn add_expense(
        &self,
        group_id: Uuid,
        amount: i64,
        description: &str,
        paid_by_id: Uuid,
        split_member_ids: &[Uuid],
    ) -> ResultEngine<StoredExpense> {
        let description = validate::normalize_expense_description(description)?;
        validate::validate_expense_amount(amount)?;
        validate::validate_split_member_ids(split_member_ids)?;

        with_tx!(self, |db_tx| {
            Self::require_group(&db_tx, group_id).await?;
            let roster = Self::member_names(&db_tx, group_id).await?;

            let paid_by_name = roster
                .get(&paid_by_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("payer not in group".to_string()))?;
            let splits = build_splits(amount, split_member_ids, &roster)?;

            let expense = StoredExpense::new(
                group_id,
                amount,
                description,
                paid_by_id,
                paid_by_name,
                splits,
                Utc::now(),
            );

            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            for (position, split) in expense.splits.iter().enumerate() {
                split
                    .into_active_model(expense.id, position as i32)
                    .insert(&db_tx)
                    .await?;
            }

            Ok(expense)
        })
    }

    /// Replaces an expense's amount, description, payer and split.
    ///
    /// Shares are recomputed from scratch with the same remainder rule as
    /// creation; the old split rows are discarded.
    pub async fn update_expense(
        &self,
        group_id: Uuid,
        expense_id: Uuid,
        amount: i64,
        description: &str,
        paid_by_id: Uuid,
        split_member_ids: &[Uuid],
    ) -> ResultEngine<StoredExpense> {
        let description = validate::normalize_expense_description(description)?;
        validate::validate_expense_amount(amount)?;
        validate::validate_split_member_ids(split_member_ids)?;

        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
            let existing = StoredExpense::try_from(model)?;
            // An expense addressed through the wrong group is as good as
            // absent.
            if existing.group_id != group_id {
                return Err(EngineError::KeyNotFound("expense not exists".to_string()));
            }

            let roster = Self::member_names(&db_tx, group_id).await?;
            let paid_by_name = roster
                .get(&paid_by_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("payer not in group".to_string()))?;
            let splits = build_splits(amount, split_member_ids, &roster)?;

            let expense_active = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                amount: ActiveValue::Set(amount),
                description: ActiveValue::Set(description.clone()),
                paid_by_id: ActiveValue::Set(paid_by_id.to_string()),
                paid_by_name: ActiveValue::Set(paid_by_name.clone()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let updated = expense_active.update(&db_tx).await?;

            expense_splits::Entity::delete_many()
                .filter(expense_splits::Column::ExpenseId.eq(expense_id.to_string()))
                .exec(&db_tx)
                .await?;
            for (position, split) in splits.iter().enumerate() {
                split
                    .into_active_model(expense_id, position as i32)
                    .insert(&db_tx)
                    .await?;
            }

            let mut expense = StoredExpense::try_from(updated)?;
            expense.splits = splits;
            Ok(expense)
        })
    }

    /// Deletes an expense and its split rows.
    pub async fn delete_expense(&self, group_id: Uuid, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(expense_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
            if model.group_id != group_id.to_string() {
                return Err(EngineError::KeyNotFound("expense not exists".to_string()));
            }

            expense_splits::Entity::delete_many()
                .filter(expense_splits::Column::ExpenseId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Lists a group's expenses, newest first, splits included.
    pub async fn list_expenses(&self, group_id: Uuid) -> ResultEngine<Vec<StoredExpense>> {
        Self::require_group(&self.database, group_id).await?;
        Self::fetch_expenses(&self.database, group_id).await
    }

    /// Expense query shared by [`Self::list_expenses`] and the settlement
    /// snapshot; existence of the group is the caller's concern.
    pub(super) async fn fetch_expenses<C: ConnectionTrait>(
        conn: &C,
        group_id: Uuid,
    ) -> ResultEngine<Vec<StoredExpense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.to_string()))
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_desc(expenses::Column::Id)
            .all(conn)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let mut expense = StoredExpense::try_from(model)?;
            expense.splits = Self::load_splits(conn, expense.id).await?;
            out.push(expense);
        }
        Ok(out)
    }

    /// Loads one expense's splits in stored (submitted) order.
    pub(super) async fn load_splits<C: ConnectionTrait>(
        conn: &C,
        expense_id: Uuid,
    ) -> ResultEngine<Vec<ExpenseSplit>> {
        let models = expense_splits::Entity::find()
            .filter(expense_splits::Column::ExpenseId.eq(expense_id.to_string()))
            .order_by_asc(expense_splits::Column::Position)
            .all(conn)
            .await?;
        models.into_iter().map(ExpenseSplit::try_from).collect()
    }

    /// Member id → name map used to resolve and validate references.
    pub(super) async fn member_names<C: ConnectionTrait>(
        conn: &C,
        group_id: Uuid,
    ) -> ResultEngine<HashMap<Uuid, String>> {
        let members = Self::load_members(conn, group_id).await?;
        Ok(members.into_iter().map(|m| (m.id, m.name)).collect())
    }
}

/// Builds per-member shares in submitted order; the first `amount % n`
/// members absorb the leftover units.
fn build_splits(
    amount: i64,
    split_member_ids: &[Uuid],
    roster: &HashMap<Uuid, String>,
) -> ResultEngine<Vec<ExpenseSplit>> {
    let shares = split_amounts(amount, split_member_ids.len());
    split_member_ids
        .iter()
        .zip(shares)
        .map(|(member_id, share)| {
            let member_name = roster
                .get(member_id)
                .cloned()
                .ok_or_else(|| EngineError::KeyNotFound("split member not in group".to_string()))?;
            Ok(ExpenseSplit {
                member_id: *member_id,
                member_name,
                amount: share,
            })
        })
        .collect()
}
