use chrono::Utc;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, GroupMember, ResultEngine, expense_splits, expenses, members, validate,
};

use super::{Engine, with_tx};

impl Engine {
    /// Adds a member to an existing group.
    pub async fn add_member(&self, group_id: Uuid, name: &str) -> ResultEngine<GroupMember> {
        let name = validate::normalize_member_name(name)?;

        with_tx!(self, |db_tx| {
            Self::require_group(&db_tx, group_id).await?;

            let roster_size = members::Entity::find()
                .filter(members::Column::GroupId.eq(group_id.to_string()))
                .count(&db_tx)
                .await?;
            if roster_size as usize >= validate::MAX_MEMBERS_PER_GROUP {
                return Err(EngineError::InvalidName(format!(
                    "at most {} members per group",
                    validate::MAX_MEMBERS_PER_GROUP
                )));
            }

            let exists = members::Entity::find()
                .filter(members::Column::GroupId.eq(group_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let member = GroupMember::new(name, Utc::now());
            member.into_active_model(group_id).insert(&db_tx).await?;
            Ok(member)
        })
    }

    /// Removes a member from a group.
    ///
    /// Refused while any expense still references them (as payer or in a
    /// split): dropping such a member would leave the stored ledger unable
    /// to balance.
    pub async fn remove_member(&self, group_id: Uuid, member_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            Self::require_group(&db_tx, group_id).await?;

            let member_model = members::Entity::find_by_id(member_id.to_string())
                .filter(members::Column::GroupId.eq(group_id.to_string()))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("member not exists".to_string()))?;

            let paid = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.to_string()))
                .filter(expenses::Column::PaidById.eq(member_id.to_string()))
                .count(&db_tx)
                .await?;
            let split = expense_splits::Entity::find()
                .filter(expense_splits::Column::MemberId.eq(member_id.to_string()))
                .count(&db_tx)
                .await?;
            if paid > 0 || split > 0 {
                return Err(EngineError::MemberInUse(member_model.name));
            }

            members::Entity::delete_by_id(member_model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
