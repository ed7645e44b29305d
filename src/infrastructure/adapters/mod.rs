//! Enrichment adapters
//!
//! The embedding and generation services are external collaborators; this
//! module defines their contracts only. Implementations are injected into
//! the pipeline by the caller, which owns their lifecycle; there are no
//! process-wide client singletons.
//!
//! Calls are blocking round-trips to remote models and may take seconds;
//! callers batch where the contract allows it (translation takes a word
//! batch per chunk, definitions and examples are per-word because the
//! output is conditioned on per-word context).

use crate::shared::LanguageCode;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by the external enrichment services
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Embedding model call failed
    #[error("embedding service failure: {0}")]
    Embedding(String),

    /// Generation model call failed
    #[error("generation service failure: {0}")]
    Generation(String),

    /// The service did not answer within its deadline
    #[error("enrichment service timed out: {0}")]
    Timeout(String),
}

/// A fixed-length, unit-normalized vector plus the model that produced it.
///
/// Every call in a deployment returns the same dimensionality; the model
/// identifier is persisted next to the vector so mixed-model rows can be
/// told apart after a model upgrade.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Vec<f32>,
    pub model: String,
}

/// Text → unit vector
#[async_trait]
pub trait EmbeddingAdapter: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, AdapterError>;

    /// Identifier of the deployed embedding model
    fn model_id(&self) -> &str;
}

/// Word/context/language → generated enrichment text.
///
/// Any operation may return partial or empty results; an empty map or list
/// means "nothing generated", not an error.
#[async_trait]
pub trait GenerationAdapter: Send + Sync {
    /// Translate a batch of lemmas, disambiguated by the surrounding context.
    /// Returns a map from lemma to candidate translations; lemmas the model
    /// could not translate are simply absent.
    async fn translate(
        &self,
        context: &str,
        words: &[String],
        src_language: LanguageCode,
        tgt_language: LanguageCode,
    ) -> Result<HashMap<String, Vec<String>>, AdapterError>;

    /// Generate definitions for one word, optionally grounded in the
    /// sentence it was seen in.
    async fn define(
        &self,
        word: &str,
        language: LanguageCode,
        context: Option<&str>,
    ) -> Result<Vec<String>, AdapterError>;

    /// Generate `count` example sentences for one word. When a definition is
    /// given the examples must match that sense; without one the model falls
    /// back to the word's most common sense.
    async fn exemplify(
        &self,
        word: &str,
        language: LanguageCode,
        definition: Option<&str>,
        count: usize,
    ) -> Result<Vec<String>, AdapterError>;
}
