//! Database entities
//!
//! Every table follows the hybrid ID convention: an `i32` auto-increment
//! primary key for joins plus a unique `Uuid` for external references.
//! Entities carrying generated text also carry an embedding column group
//! (`embedding`, `embedding_model`, `embedding_updated_at`).

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

pub mod chunk;
pub mod definition;
pub mod dictionary_entry;
pub mod example;
pub mod language;
pub mod learning_profile;
pub mod text;
pub mod translation;
pub mod user;
pub mod word;

/// A unit embedding vector stored as a JSON column.
///
/// Sqlite has no native vector type; distance ordering happens in the query
/// layer over candidate rows instead of in an index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct EmbeddingVector(pub Vec<f32>);

impl EmbeddingVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }
}
