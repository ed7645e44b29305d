//! Dictionary entry entity
//!
//! Binds one word into one learning profile's personal vocabulary. All
//! enrichment artifacts (translations, definitions, examples) hang off this
//! row, not off the bare word, so the same word can appear independently in
//! several users' dictionaries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dictionary_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub learning_profile_id: i32,
    pub word_id: i32,
    /// Free-form user notes
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::learning_profile::Entity",
        from = "Column::LearningProfileId",
        to = "super::learning_profile::Column::Id"
    )]
    LearningProfile,
    #[sea_orm(
        belongs_to = "super::word::Entity",
        from = "Column::WordId",
        to = "super::word::Column::Id"
    )]
    Word,
    #[sea_orm(has_many = "super::translation::Entity")]
    Translation,
    #[sea_orm(has_many = "super::definition::Entity")]
    Definition,
    #[sea_orm(has_many = "super::example::Entity")]
    Example,
}

impl Related<super::learning_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LearningProfile.def()
    }
}

impl Related<super::word::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Word.def()
    }
}

impl Related<super::translation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Translation.def()
    }
}

impl Related<super::definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Definition.def()
    }
}

impl Related<super::example::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Example.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
