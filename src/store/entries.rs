//! Dictionary entries and their enrichment artifacts
//!
//! Translations, definitions and examples all attach to a dictionary entry
//! (not to the bare word) and are embedded at creation; edits refresh the
//! affected vector. Every write checks that the entry belongs to the acting
//! user before touching anything.

use super::{is_unique_violation, CreateOutcome, LexicalStore, Result, StoreError};
use crate::infrastructure::database::entities::{
    definition, dictionary_entry, example, translation, EmbeddingVector,
};
use crate::shared::LanguageCode;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;
use uuid::Uuid;

impl LexicalStore {
    /// Bind a word into a profile's dictionary. Surfaces a conflict when the
    /// word is already in that dictionary.
    pub async fn create_dictionary_entry(
        &self,
        profile_id: i32,
        word_id: i32,
        user_id: i32,
        notes: Option<String>,
    ) -> Result<dictionary_entry::Model> {
        match self
            .create_or_fetch_entry(profile_id, word_id, user_id, notes)
            .await?
        {
            CreateOutcome::Created(row) => Ok(row),
            CreateOutcome::Existing(_) => Err(StoreError::Conflict(
                "word is already in this dictionary".into(),
            )),
        }
    }

    /// Idempotent dictionary binding.
    pub async fn create_or_fetch_entry(
        &self,
        profile_id: i32,
        word_id: i32,
        user_id: i32,
        notes: Option<String>,
    ) -> Result<CreateOutcome<dictionary_entry::Model>> {
        self.get_owned_profile(profile_id, user_id).await?;

        let fetch = || async {
            dictionary_entry::Entity::find()
                .filter(dictionary_entry::Column::LearningProfileId.eq(profile_id))
                .filter(dictionary_entry::Column::WordId.eq(word_id))
                .one(&self.conn)
                .await
        };

        if let Some(existing) = fetch().await? {
            return Ok(CreateOutcome::Existing(existing));
        }

        let now = Utc::now();
        let insert = dictionary_entry::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            learning_profile_id: Set(profile_id),
            word_id: Set(word_id),
            notes: Set(notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await;

        match insert {
            Ok(row) => Ok(CreateOutcome::Created(row)),
            Err(err) if is_unique_violation(&err) => {
                debug!(
                    "Lost creation race for entry (profile {}, word {})",
                    profile_id, word_id
                );
                let row = fetch().await?.ok_or_else(|| {
                    StoreError::NotFound(format!("entry for word {}", word_id))
                })?;
                Ok(CreateOutcome::Existing(row))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Fetch an entry and verify the acting user owns it through its profile.
    pub async fn get_owned_entry(
        &self,
        entry_id: i32,
        user_id: i32,
    ) -> Result<dictionary_entry::Model> {
        let entry = dictionary_entry::Entity::find_by_id(entry_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("dictionary entry {}", entry_id)))?;
        self.get_owned_profile(entry.learning_profile_id, user_id)
            .await?;
        Ok(entry)
    }

    /// Attach a translation to an entry. Multiple translations per entry are
    /// expected (a word accumulates senses), so there is no natural key here.
    pub async fn create_translation(
        &self,
        entry_id: i32,
        language: LanguageCode,
        content: &str,
        user_id: i32,
    ) -> Result<translation::Model> {
        self.get_owned_entry(entry_id, user_id).await?;
        let language_id = self.language_id(language).await?;
        let embedding = self.embedder().embed(content).await?;

        let now = Utc::now();
        Ok(translation::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            dictionary_entry_id: Set(entry_id),
            language_id: Set(language_id),
            content: Set(content.to_string()),
            embedding: Set(Some(EmbeddingVector(embedding.vector))),
            embedding_model: Set(Some(embedding.model)),
            embedding_updated_at: Set(Some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?)
    }

    /// Attach a definition to an entry, optionally recording the text whose
    /// chunk motivated it.
    pub async fn create_definition(
        &self,
        entry_id: i32,
        language: LanguageCode,
        content: &str,
        source_text_id: Option<i32>,
        user_id: i32,
    ) -> Result<definition::Model> {
        self.get_owned_entry(entry_id, user_id).await?;
        let language_id = self.language_id(language).await?;
        let embedding = self.embedder().embed(content).await?;

        let now = Utc::now();
        Ok(definition::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            dictionary_entry_id: Set(entry_id),
            language_id: Set(language_id),
            content: Set(content.to_string()),
            source_text_id: Set(source_text_id),
            embedding: Set(Some(EmbeddingVector(embedding.vector))),
            embedding_model: Set(Some(embedding.model)),
            embedding_updated_at: Set(Some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?)
    }

    /// Attach an example sentence to an entry.
    pub async fn create_example(
        &self,
        entry_id: i32,
        language: LanguageCode,
        content: &str,
        user_id: i32,
    ) -> Result<example::Model> {
        self.get_owned_entry(entry_id, user_id).await?;
        let language_id = self.language_id(language).await?;
        let embedding = self.embedder().embed(content).await?;

        let now = Utc::now();
        Ok(example::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            dictionary_entry_id: Set(entry_id),
            language_id: Set(language_id),
            content: Set(content.to_string()),
            embedding: Set(Some(EmbeddingVector(embedding.vector))),
            embedding_model: Set(Some(embedding.model)),
            embedding_updated_at: Set(Some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?)
    }

    /// Rewrite a translation's text, refreshing its embedding.
    pub async fn update_translation(
        &self,
        translation_id: i32,
        content: &str,
        user_id: i32,
    ) -> Result<translation::Model> {
        let row = translation::Entity::find_by_id(translation_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("translation {}", translation_id)))?;
        self.get_owned_entry(row.dictionary_entry_id, user_id).await?;

        if row.content == content {
            return Ok(row);
        }

        let embedding = self.embedder().embed(content).await?;
        let now = Utc::now();
        let mut active: translation::ActiveModel = row.into();
        active.content = Set(content.to_string());
        active.embedding = Set(Some(EmbeddingVector(embedding.vector)));
        active.embedding_model = Set(Some(embedding.model));
        active.embedding_updated_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(&self.conn).await?)
    }

    /// Rewrite a definition's text, refreshing its embedding.
    pub async fn update_definition(
        &self,
        definition_id: i32,
        content: &str,
        user_id: i32,
    ) -> Result<definition::Model> {
        let row = definition::Entity::find_by_id(definition_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("definition {}", definition_id)))?;
        self.get_owned_entry(row.dictionary_entry_id, user_id).await?;

        if row.content == content {
            return Ok(row);
        }

        let embedding = self.embedder().embed(content).await?;
        let now = Utc::now();
        let mut active: definition::ActiveModel = row.into();
        active.content = Set(content.to_string());
        active.embedding = Set(Some(EmbeddingVector(embedding.vector)));
        active.embedding_model = Set(Some(embedding.model));
        active.embedding_updated_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(&self.conn).await?)
    }

    /// Rewrite an example's text, refreshing its embedding.
    pub async fn update_example(
        &self,
        example_id: i32,
        content: &str,
        user_id: i32,
    ) -> Result<example::Model> {
        let row = example::Entity::find_by_id(example_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("example {}", example_id)))?;
        self.get_owned_entry(row.dictionary_entry_id, user_id).await?;

        if row.content == content {
            return Ok(row);
        }

        let embedding = self.embedder().embed(content).await?;
        let now = Utc::now();
        let mut active: example::ActiveModel = row.into();
        active.content = Set(content.to_string());
        active.embedding = Set(Some(EmbeddingVector(embedding.vector)));
        active.embedding_model = Set(Some(embedding.model));
        active.embedding_updated_at = Set(Some(now));
        active.updated_at = Set(now);
        Ok(active.update(&self.conn).await?)
    }
}
