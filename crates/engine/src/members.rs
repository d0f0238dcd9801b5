//! Group members.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: Uuid,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

impl GroupMember {
    pub fn new(name: String, joined_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            joined_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub joined_at: DateTimeUtc,
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
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl GroupMember {
    pub fn into_active_model(&self, group_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id.to_string()),
            group_id: ActiveValue::Set(group_id.to_string()),
            name: ActiveValue::Set(self.name.clone()),
            joined_at: ActiveValue::Set(self.joined_at),
        }
    }
}

impl TryFrom<Model> for GroupMember {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("member not exists".to_string()))?,
            name: model.name,
            joined_at: model.joined_at,
        })
    }
}
