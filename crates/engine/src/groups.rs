//! Group primitives.
//!
//! A `Group` is the aggregate everything else hangs off: it owns members and
//! expenses and carries the (single) currency its amounts are denominated in.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, members::GroupMember};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub members: Vec<GroupMember>,
}

impl Group {
    pub fn new(
        name: String,
        description: Option<String>,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            currency,
            created_at: now,
            updated_at: now,
            members: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::members::Entity")]
    Members,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Group> for ActiveModel {
    fn from(group: &Group) -> Self {
        Self {
            id: ActiveValue::Set(group.id.to_string()),
            name: ActiveValue::Set(group.name.clone()),
            description: ActiveValue::Set(group.description.clone()),
            currency: ActiveValue::Set(group.currency.code().to_string()),
            created_at: ActiveValue::Set(group.created_at),
            updated_at: ActiveValue::Set(group.updated_at),
        }
    }
}

impl TryFrom<Model> for Group {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("group not exists".to_string()))?,
            name: model.name,
            description: model.description,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
            members: Vec::new(),
        })
    }
}
