use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Currency, EngineError, Group, GroupMember, ResultEngine, groups, validate,
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a group with its founding members.
    pub async fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
        currency: Option<Currency>,
        member_names: &[String],
    ) -> ResultEngine<Group> {
        let name = validate::normalize_group_name(name)?;
        let description = validate::normalize_description(description)?;
        let member_names = validate::normalize_member_names(member_names)?;

        let now = Utc::now();
        let mut group = Group::new(name.clone(), description, currency.unwrap_or_default(), now);
        let group_entry: groups::ActiveModel = (&group).into();

        with_tx!(self, |db_tx| {
            // Group names are unique (case-insensitive) to keep lookups
            // unambiguous.
            let exists = groups::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            group_entry.insert(&db_tx).await?;

            for member_name in member_names {
                let member = GroupMember::new(member_name, now);
                member.into_active_model(group.id).insert(&db_tx).await?;
                group.members.push(member);
            }

            Ok(group)
        })
    }

    /// Returns a group with its member roster.
    pub async fn group(&self, group_id: Uuid) -> ResultEngine<Group> {
        let model = Self::require_group(&self.database, group_id).await?;
        let mut group = Group::try_from(model)?;
        group.members = Self::load_members(&self.database, group_id).await?;
        Ok(group)
    }

    /// Lists all groups, without member rosters, newest first.
    pub async fn list_groups(&self) -> ResultEngine<Vec<Group>> {
        let models = groups::Entity::find()
            .order_by_desc(groups::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Group::try_from).collect()
    }

    /// Updates a group's name, description and currency.
    pub async fn update_group(
        &self,
        group_id: Uuid,
        name: &str,
        description: Option<&str>,
        currency: Currency,
    ) -> ResultEngine<Group> {
        let name = validate::normalize_group_name(name)?;
        let description = validate::normalize_description(description)?;

        with_tx!(self, |db_tx| {
            let model = Self::require_group(&db_tx, group_id).await?;

            let exists = groups::Entity::find()
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .filter(groups::Column::Id.ne(model.id.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let group_active = groups::ActiveModel {
                id: ActiveValue::Set(model.id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                currency: ActiveValue::Set(currency.code().to_string()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let updated = group_active.update(&db_tx).await?;

            let mut group = Group::try_from(updated)?;
            group.members = Self::load_members(&db_tx, group_id).await?;
            Ok(group)
        })
    }

    /// Deletes a group and everything it owns.
    pub async fn delete_group(&self, group_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = Self::require_group(&db_tx, group_id).await?;
            let group_db_id = model.id;

            // Explicit cascade inside one DB transaction; sqlite FK
            // enforcement is off by default, so we do not rely on it.
            let backend = self.database.get_database_backend();
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM expense_splits WHERE expense_id IN \
                     (SELECT id FROM expenses WHERE group_id = ?);",
                    vec![group_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM expenses WHERE group_id = ?;",
                    vec![group_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM members WHERE group_id = ?;",
                    vec![group_db_id.clone().into()],
                ))
                .await?;
            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM groups WHERE id = ?;",
                    vec![group_db_id.into()],
                ))
                .await?;

            Ok(())
        })
    }
}
