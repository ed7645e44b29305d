//! Learning profile entity
//!
//! One (user, primary language, foreign language) triple; the unique
//! constraint on the triple lives in the initial migration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "learning_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub user_id: i32,
    pub primary_language_id: i32,
    pub foreign_language_id: i32,
    /// The active profile drives ingestion when none is named explicitly
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::language::Entity",
        from = "Column::PrimaryLanguageId",
        to = "super::language::Column::Id"
    )]
    PrimaryLanguage,
    #[sea_orm(
        belongs_to = "super::language::Entity",
        from = "Column::ForeignLanguageId",
        to = "super::language::Column::Id"
    )]
    ForeignLanguage,
    #[sea_orm(has_many = "super::dictionary_entry::Entity")]
    DictionaryEntry,
    #[sea_orm(has_many = "super::text::Entity")]
    Text,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::dictionary_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DictionaryEntry.def()
    }
}

impl Related<super::text::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Text.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
