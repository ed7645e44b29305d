//! Lexical store
//!
//! Typed persistence layer over the database. Every entity with a natural
//! key gets a `create_*` that surfaces conflicts and a `create_or_fetch_*`
//! that resolves them transparently: insert, catch the store's uniqueness
//! violation, re-query by the natural key, return the existing row. Two
//! concurrent ingestions of overlapping vocabulary converge to one row per
//! key, with the loser of the race receiving the winner's row.

mod entries;
mod error;
mod profiles;
mod texts;
mod users;
mod words;

pub use error::{Result, StoreError};

use crate::infrastructure::adapters::EmbeddingAdapter;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Result of an idempotent create: either the row was inserted, or another
/// writer got there first and the pre-existing row is returned instead.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome<T> {
    Created(T),
    Existing(T),
}

impl<T> CreateOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(row) | Self::Existing(row) => row,
        }
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Self::Created(row) | Self::Existing(row) => row,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Handle over the durable entities plus the embedding adapter used to
/// vectorize rows at creation time.
#[derive(Clone)]
pub struct LexicalStore {
    conn: DatabaseConnection,
    embedder: Arc<dyn EmbeddingAdapter>,
}

impl LexicalStore {
    pub fn new(conn: DatabaseConnection, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self { conn, embedder }
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub(crate) fn embedder(&self) -> &dyn EmbeddingAdapter {
        self.embedder.as_ref()
    }
}

/// True when the database rejected an insert because a uniqueness
/// constraint (a natural key) already holds for another row.
pub(crate) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(err.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_)))
}
