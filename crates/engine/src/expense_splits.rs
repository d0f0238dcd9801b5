//! Per-member expense shares.
//!
//! One row per `(expense, member)` pair. `position` preserves the submitted
//! split order; the remainder units of a non-divisible amount sit on the
//! lowest positions, so order must survive round-trips through the database.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSplit {
    pub member_id: Uuid,
    pub member_name: String,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub member_id: String,
    pub member_name: String,
    pub amount: i64,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ExpenseSplit {
    pub fn into_active_model(&self, expense_id: Uuid, position: i32) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            expense_id: ActiveValue::Set(expense_id.to_string()),
            member_id: ActiveValue::Set(self.member_id.to_string()),
            member_name: ActiveValue::Set(self.member_name.clone()),
            amount: ActiveValue::Set(self.amount),
            position: ActiveValue::Set(position),
        }
    }
}

impl TryFrom<Model> for ExpenseSplit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            member_id: Uuid::parse_str(&model.member_id)
                .map_err(|_| EngineError::KeyNotFound("member not exists".to_string()))?,
            member_name: model.member_name,
            amount: model.amount,
        })
    }
}
