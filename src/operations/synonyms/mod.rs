//! Vector-similarity synonym retrieval
//!
//! Finds the words in a profile's dictionary whose lemma embeddings sit
//! close to a query lemma. The candidate set is a filtered scan (profile and
//! language), ranked in memory by cosine distance; dictionaries are
//! per-user vocabularies, small enough that an index-free scan stays cheap.

use crate::infrastructure::database::entities::word;
use crate::shared::{cosine_distance, LanguageCode};
use crate::store::{LexicalStore, StoreError};
use tracing::debug;

/// A ranked neighbour of the query lemma.
#[derive(Debug, Clone)]
pub struct SynonymMatch {
    pub word: word::Model,
    /// Cosine similarity to the query, in `[min_similarity, 1]`
    pub similarity: f32,
}

/// Ranks a profile's dictionary words against a query lemma.
pub struct SynonymResolver {
    store: LexicalStore,
}

impl SynonymResolver {
    pub fn new(store: LexicalStore) -> Self {
        Self { store }
    }

    /// Top `top_k` dictionary words within `min_similarity` of `lemma`.
    ///
    /// The query lemma itself is excluded from the candidates, as are words
    /// outside the given language and words without a stored embedding.
    /// Equal distances rank in row-id order, so repeated calls over an
    /// unchanged dictionary return the same list.
    pub async fn resolve(
        &self,
        profile_id: i32,
        lemma: &str,
        language: LanguageCode,
        top_k: usize,
        min_similarity: f32,
    ) -> Result<Vec<SynonymMatch>, StoreError> {
        if !(0.0..=1.0).contains(&min_similarity) {
            return Err(StoreError::Validation(format!(
                "min_similarity must be within [0, 1], got {min_similarity}"
            )));
        }

        let query = self.store.embedder().embed(lemma).await?;
        let candidates = self
            .store
            .profile_words(profile_id, language, lemma)
            .await?;
        debug!(
            %language,
            candidates = candidates.len(),
            "Ranking dictionary words against '{lemma}'"
        );

        let max_distance = 1.0 - min_similarity;
        let mut ranked: Vec<(f32, SynonymMatch)> = candidates
            .into_iter()
            .filter_map(|word| {
                let embedding = word.embedding.as_ref()?;
                let distance = cosine_distance(&query.vector, embedding.as_slice());
                if distance <= max_distance {
                    let similarity = 1.0 - distance;
                    Some((distance, SynonymMatch { word, similarity }))
                } else {
                    None
                }
            })
            .collect();

        // Candidates arrive in row-id order; a stable sort keeps that order
        // for equal distances.
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(top_k);
        Ok(ranked.into_iter().map(|(_, m)| m).collect())
    }
}
