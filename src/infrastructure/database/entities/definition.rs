//! Definition entity

use super::EmbeddingVector;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "definitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub dictionary_entry_id: i32,
    pub language_id: i32,
    pub content: String,
    /// The text whose chunk motivated this definition, when known
    pub source_text_id: Option<i32>,
    pub embedding: Option<EmbeddingVector>,
    pub embedding_model: Option<String>,
    pub embedding_updated_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dictionary_entry::Entity",
        from = "Column::DictionaryEntryId",
        to = "super::dictionary_entry::Column::Id"
    )]
    DictionaryEntry,
    #[sea_orm(
        belongs_to = "super::language::Entity",
        from = "Column::LanguageId",
        to = "super::language::Column::Id"
    )]
    Language,
    #[sea_orm(
        belongs_to = "super::text::Entity",
        from = "Column::SourceTextId",
        to = "super::text::Column::Id"
    )]
    SourceText,
}

impl Related<super::dictionary_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DictionaryEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
