//! Word entity
//!
//! One row per distinct (lemma, language, part of speech). The embedding is
//! computed once at creation and refreshed only when the lemma is edited.

use super::EmbeddingVector;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "words")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    /// Canonical base form, e.g. "run" for "running"
    pub lemma: String,
    pub language_id: i32,
    /// Shared tag vocabulary as its stable integer form
    pub pos: i32,
    pub embedding: Option<EmbeddingVector>,
    pub embedding_model: Option<String>,
    pub embedding_updated_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::language::Entity",
        from = "Column::LanguageId",
        to = "super::language::Column::Id"
    )]
    Language,
    #[sea_orm(has_many = "super::dictionary_entry::Entity")]
    DictionaryEntry,
}

impl Related<super::language::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Language.def()
    }
}

impl Related<super::dictionary_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DictionaryEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
