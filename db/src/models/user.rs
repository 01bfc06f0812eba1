use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Administrative account; only used as event creator and attendance
/// verifier, never part of the reporting core.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event::Entity")]
    CreatedEvents,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
