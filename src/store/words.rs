//! Word rows and their natural-key semantics
//!
//! A word exists once per (lemma, language, part of speech) across the whole
//! store; per-user scoping happens through dictionary entries, never by
//! duplicating word rows.

use super::{is_unique_violation, CreateOutcome, LexicalStore, Result, StoreError};
use crate::infrastructure::database::entities::{
    dictionary_entry, learning_profile, word, EmbeddingVector,
};
use crate::shared::{LanguageCode, PartOfSpeech};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use tracing::debug;
use uuid::Uuid;

impl LexicalStore {
    /// Look a word up by its natural key.
    pub async fn find_word(
        &self,
        lemma: &str,
        language: LanguageCode,
        pos: PartOfSpeech,
    ) -> Result<Option<word::Model>> {
        let language_id = self.language_id(language).await?;
        Ok(word::Entity::find()
            .filter(word::Column::Lemma.eq(lemma))
            .filter(word::Column::LanguageId.eq(language_id))
            .filter(word::Column::Pos.eq(i32::from(pos)))
            .one(&self.conn)
            .await?)
    }

    /// Create a word, embedding the lemma at creation time. Surfaces a
    /// conflict when the natural key already exists; ingestion callers want
    /// [`LexicalStore::create_or_fetch_word`] instead.
    pub async fn create_word(
        &self,
        lemma: &str,
        language: LanguageCode,
        pos: PartOfSpeech,
    ) -> Result<word::Model> {
        match self.create_or_fetch_word(lemma, language, pos).await? {
            CreateOutcome::Created(row) => Ok(row),
            CreateOutcome::Existing(_) => {
                Err(StoreError::Conflict(format!("word '{}' already exists", lemma)))
            }
        }
    }

    /// Idempotent word creation. The embedding is computed before the
    /// insert; when the insert loses a race the freshly computed vector is
    /// discarded in favor of the winner's row.
    pub async fn create_or_fetch_word(
        &self,
        lemma: &str,
        language: LanguageCode,
        pos: PartOfSpeech,
    ) -> Result<CreateOutcome<word::Model>> {
        let language_id = self.language_id(language).await?;

        if let Some(existing) = self.find_word(lemma, language, pos).await? {
            return Ok(CreateOutcome::Existing(existing));
        }

        let embedding = self.embedder().embed(lemma).await?;
        let now = Utc::now();
        let insert = word::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            lemma: Set(lemma.to_string()),
            language_id: Set(language_id),
            pos: Set(i32::from(pos)),
            embedding: Set(Some(EmbeddingVector(embedding.vector))),
            embedding_model: Set(Some(embedding.model)),
            embedding_updated_at: Set(Some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await;

        match insert {
            Ok(row) => Ok(CreateOutcome::Created(row)),
            Err(err) if is_unique_violation(&err) => {
                debug!("Lost creation race for word '{}', fetching winner", lemma);
                let row = self
                    .find_word(lemma, language, pos)
                    .await?
                    .ok_or_else(|| StoreError::NotFound(format!("word '{}'", lemma)))?;
                Ok(CreateOutcome::Existing(row))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Change a word's lemma, refreshing its embedding. The acting user must
    /// hold the word in at least one of their dictionaries.
    pub async fn update_word_lemma(
        &self,
        word_id: i32,
        new_lemma: &str,
        user_id: i32,
    ) -> Result<word::Model> {
        let row = word::Entity::find_by_id(word_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("word {}", word_id)))?;

        let has_access = dictionary_entry::Entity::find()
            .join(
                JoinType::InnerJoin,
                dictionary_entry::Relation::LearningProfile.def(),
            )
            .filter(dictionary_entry::Column::WordId.eq(word_id))
            .filter(learning_profile::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?
            > 0;
        if !has_access {
            return Err(StoreError::Forbidden(
                "word is not in any of the requesting user's dictionaries".into(),
            ));
        }

        if new_lemma == row.lemma {
            return Ok(row);
        }

        let duplicate = word::Entity::find()
            .filter(word::Column::Lemma.eq(new_lemma))
            .filter(word::Column::LanguageId.eq(row.language_id))
            .filter(word::Column::Pos.eq(row.pos))
            .filter(word::Column::Id.ne(word_id))
            .one(&self.conn)
            .await?;
        if duplicate.is_some() {
            return Err(StoreError::Conflict(format!(
                "word '{}' already exists in this language",
                new_lemma
            )));
        }

        let embedding = self.embedder().embed(new_lemma).await?;
        let now = Utc::now();
        let mut active: word::ActiveModel = row.into();
        active.lemma = Set(new_lemma.to_string());
        active.embedding = Set(Some(EmbeddingVector(embedding.vector)));
        active.embedding_model = Set(Some(embedding.model));
        active.embedding_updated_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(&self.conn).await?)
    }

    /// Existence probe used by the normalizer's dedup pass: is this
    /// (lemma, pos) already in the profile's dictionary?
    pub async fn word_in_dictionary(
        &self,
        profile_id: i32,
        lemma: &str,
        pos: PartOfSpeech,
    ) -> Result<bool> {
        let count = word::Entity::find()
            .join(JoinType::InnerJoin, word::Relation::DictionaryEntry.def())
            .filter(dictionary_entry::Column::LearningProfileId.eq(profile_id))
            .filter(word::Column::Lemma.eq(lemma))
            .filter(word::Column::Pos.eq(i32::from(pos)))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Candidate set for the synonym resolver: all words linked into the
    /// profile's dictionary in the given language, excluding the query lemma
    /// itself. Ordered by row id so equal-distance ties rank in insertion
    /// order.
    pub async fn profile_words(
        &self,
        profile_id: i32,
        language: LanguageCode,
        exclude_lemma: &str,
    ) -> Result<Vec<word::Model>> {
        let language_id = self.language_id(language).await?;
        Ok(word::Entity::find()
            .join(JoinType::InnerJoin, word::Relation::DictionaryEntry.def())
            .filter(dictionary_entry::Column::LearningProfileId.eq(profile_id))
            .filter(word::Column::LanguageId.eq(language_id))
            .filter(word::Column::Lemma.ne(exclude_lemma))
            .order_by_asc(word::Column::Id)
            .all(&self.conn)
            .await?)
    }
}
