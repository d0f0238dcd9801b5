//! Stored expenses.
//!
//! A `StoredExpense` is the persisted form of one payment made on behalf of
//! the group: the full amount paid, who fronted it, and the per-member shares
//! it is split into. Shares are materialized at write time with the same
//! remainder rule the balance calculator uses, so replaying stored splits
//! always reproduces the expense amount exactly.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, expense_splits::ExpenseSplit};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredExpense {
    pub id: Uuid,
    pub group_id: Uuid,
    pub amount: i64,
    pub description: String,
    pub paid_by_id: Uuid,
    pub paid_by_name: String,
    pub splits: Vec<ExpenseSplit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredExpense {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        group_id: Uuid,
        amount: i64,
        description: String,
        paid_by_id: Uuid,
        paid_by_name: String,
        splits: Vec<ExpenseSplit>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            amount,
            description,
            paid_by_id,
            paid_by_name,
            splits,
            created_at: now,
            updated_at: now,
        }
    }

    /// The expense as the settlement core consumes it: payer plus the split
    /// member ids in stored order.
    pub fn to_settlement_input(&self) -> crate::settlement::Expense {
        crate::settlement::Expense {
            id: self.id,
            payer_id: self.paid_by_id,
            amount: self.amount,
            split_between: self.splits.iter().map(|s| s.member_id).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub amount: i64,
    pub description: String,
    pub paid_by_id: String,
    pub paid_by_name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
    #[sea_orm(has_many = "super::expense_splits::Entity")]
    ExpenseSplits,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::expense_splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseSplits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&StoredExpense> for ActiveModel {
    fn from(expense: &StoredExpense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            group_id: ActiveValue::Set(expense.group_id.to_string()),
            amount: ActiveValue::Set(expense.amount),
            description: ActiveValue::Set(expense.description.clone()),
            paid_by_id: ActiveValue::Set(expense.paid_by_id.to_string()),
            paid_by_name: ActiveValue::Set(expense.paid_by_name.clone()),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
        }
    }
}

impl TryFrom<Model> for StoredExpense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            group_id: Uuid::parse_str(&model.group_id)
                .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?,
            amount: model.amount,
            description: model.description,
            paid_by_id: Uuid::parse_str(&model.paid_by_id)
                .map_err(|_| EngineError::KeyNotFound("member not exists".to_string()))?,
            paid_by_name: model.paid_by_name,
            splits: Vec::new(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
