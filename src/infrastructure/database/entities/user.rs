//! User entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Soft-delete flag; a disabled user keeps all data
    pub disabled: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::learning_profile::Entity")]
    LearningProfile,
}

impl Related<super::learning_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LearningProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
