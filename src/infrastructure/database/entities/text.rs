//! Text entity
//!
//! Raw text submitted for ingestion. Unique per (profile, content) so the
//! same input submitted twice converges to one row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "texts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub learning_profile_id: i32,
    /// Optional link to the entry this text was submitted for
    pub dictionary_entry_id: Option<i32>,
    pub content: String,
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
        belongs_to = "super::dictionary_entry::Entity",
        from = "Column::DictionaryEntryId",
        to = "super::dictionary_entry::Column::Id"
    )]
    DictionaryEntry,
    #[sea_orm(has_many = "super::chunk::Entity")]
    Chunk,
}

impl Related<super::learning_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LearningProfile.def()
    }
}

impl Related<super::chunk::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chunk.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
