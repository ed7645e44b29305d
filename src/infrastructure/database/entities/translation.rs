//! Translation entity

use super::EmbeddingVector;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "translations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub dictionary_entry_id: i32,
    /// Target language of the translated text
    pub language_id: i32,
    pub content: String,
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
}

impl Related<super::dictionary_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DictionaryEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
