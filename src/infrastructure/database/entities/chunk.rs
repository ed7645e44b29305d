//! Chunk entity
//!
//! Ordered, overlapping context window of a parent text. Offsets are
//! character offsets into the parent's content.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chunks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub text_id: i32,
    /// Zero-based position within the parent text
    pub position: i32,
    pub start_offset: i32,
    pub end_offset: i32,
    pub content: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::text::Entity",
        from = "Column::TextId",
        to = "super::text::Column::Id"
    )]
    Text,
}

impl Related<super::text::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Text.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
