//! Store error types

use crate::infrastructure::adapters::AdapterError;
use thiserror::Error;

/// Errors surfaced by lexical store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Request was malformed and is never retried
    #[error("validation failed: {0}")]
    Validation(String),

    /// A row with the same natural key already exists
    #[error("conflict: {0}")]
    Conflict(String),

    /// Entity not found
    #[error("not found: {0}")]
    NotFound(String),

    /// The entity does not belong to the requesting user
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Embedding the row's text failed
    #[error("embedding failed: {0}")]
    Embedding(#[from] AdapterError),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
