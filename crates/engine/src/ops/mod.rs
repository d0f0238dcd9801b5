use sea_orm::{ConnectionTrait, DatabaseConnection, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, GroupMember, ResultEngine, groups as group_entity, members as member_entity,
};

mod expenses;
mod groups;
mod members;
mod settlements;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Fetches the group row or fails with `KeyNotFound`.
    async fn require_group<C: ConnectionTrait>(
        conn: &C,
        group_id: Uuid,
    ) -> ResultEngine<group_entity::Model> {
        group_entity::Entity::find_by_id(group_id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    /// Loads a group's members ordered by join time, so rosters render
    /// deterministically.
    async fn load_members<C: ConnectionTrait>(
        conn: &C,
        group_id: Uuid,
    ) -> ResultEngine<Vec<GroupMember>> {
        let models = member_entity::Entity::find()
            .filter(member_entity::Column::GroupId.eq(group_id.to_string()))
            .order_by_asc(member_entity::Column::JoinedAt)
            .order_by_asc(member_entity::Column::Id)
            .all(conn)
            .await?;

        models.into_iter().map(GroupMember::try_from).collect()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
