//! Text ingestion pipeline
//!
//! Runs a submitted text through a fixed stage sequence: candidate
//! extraction, the three generation stages, synonym resolution, then the
//! persistence stages. Generation and persistence work item-by-item and a
//! failing lemma never takes the run down with it: its error lands in the
//! stage outcome and the remaining lemmas keep going. Only infrastructure
//! failures (ownership, the text row itself, a dead connection) abort the
//! run.
//!
//! All persistence goes through the store's create-or-fetch operations, so
//! re-ingesting the same text converges on the already-persisted rows
//! instead of duplicating them.

mod state;

pub use state::{IngestReport, IngestStage, StageOutcome};

use crate::config::{AppConfig, EnrichmentConfig, RetrievalConfig};
use crate::infrastructure::adapters::GenerationAdapter;
use crate::infrastructure::database::entities::learning_profile;
use crate::normalizer::NormalizerRegistry;
use crate::operations::synonyms::SynonymResolver;
use crate::shared::LanguageCode;
use crate::store::{LexicalStore, StoreError};
use state::RunState;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Run-level ingestion failures. Item-level trouble never surfaces here;
/// it is reported through [`StageOutcome::failed`].
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("submitted text is empty")]
    EmptyText,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The staged ingestion pipeline. Construct one per process (or per test)
/// and call [`IngestPipeline::ingest`] for each submitted text; runs do not
/// share mutable state, so a pipeline can serve concurrent runs.
pub struct IngestPipeline {
    store: LexicalStore,
    generator: Arc<dyn GenerationAdapter>,
    registry: Arc<NormalizerRegistry>,
    enrichment: EnrichmentConfig,
    retrieval: RetrievalConfig,
}

impl IngestPipeline {
    pub fn new(
        store: LexicalStore,
        generator: Arc<dyn GenerationAdapter>,
        registry: Arc<NormalizerRegistry>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            generator,
            registry,
            enrichment: config.enrichment.clone(),
            retrieval: config.retrieval.clone(),
        }
    }

    /// Ingest a text against the user's active profile.
    pub async fn ingest_for_user(
        &self,
        user_id: i32,
        text: &str,
    ) -> Result<IngestReport, IngestError> {
        let profile = self.store.active_profile(user_id).await?;
        self.ingest(profile.id, user_id, text).await
    }

    /// Run the full stage sequence for one submitted text.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn ingest(
        &self,
        profile_id: i32,
        user_id: i32,
        text: &str,
    ) -> Result<IngestReport, IngestError> {
        if text.trim().is_empty() {
            return Err(IngestError::EmptyText);
        }

        let profile = self.store.get_owned_profile(profile_id, user_id).await?;
        let src = self.store.language_code(profile.primary_language_id).await?;
        let tgt = self.store.language_code(profile.foreign_language_id).await?;

        let mut state = RunState::default();

        self.extract_candidates(&mut state, &profile, text, src).await?;
        self.translate(&mut state, src, tgt).await;
        self.define(&mut state, src).await;
        self.exemplify(&mut state, src).await;
        self.resolve_synonyms(&mut state, &profile, src).await;
        self.persist_text(&mut state, &profile, text).await?;
        self.persist_words(&mut state).await;
        self.persist_entries(&mut state, &profile).await;
        self.persist_translations(&mut state, &profile, tgt).await;
        self.persist_definitions(&mut state, &profile, src).await;
        self.persist_examples(&mut state, &profile, src).await;

        debug!(stage = %IngestStage::Done, "Ingestion run finished");
        let report = state.into_report();
        info!(
            candidates = report.candidates.len(),
            failed = report.failed_lemmas().len(),
            "Ingested text {:?} for profile {}",
            report.text_id,
            profile.id
        );
        Ok(report)
    }

    /// Normalize the text and drop every lexeme already present in the
    /// profile's dictionary. Skipped lemmas count as `existing` so the
    /// report shows what dedup removed.
    async fn extract_candidates(
        &self,
        state: &mut RunState,
        profile: &learning_profile::Model,
        text: &str,
        src: LanguageCode,
    ) -> Result<(), IngestError> {
        debug!(stage = %IngestStage::ExtractCandidates, %src, "Extracting candidates");
        state.chunk_count = self.registry.chunk(text).len();

        let mut kept = Vec::new();
        for candidates in self.registry.extract(text, src) {
            let mut fresh = BTreeSet::new();
            for lexeme in &candidates.lexemes {
                if state.lexemes.contains_key(&lexeme.lemma) {
                    continue;
                }
                if self
                    .store
                    .word_in_dictionary(profile.id, &lexeme.lemma, lexeme.pos)
                    .await?
                {
                    state
                        .outcome(IngestStage::ExtractCandidates)
                        .existing
                        .insert(lexeme.lemma.clone());
                    continue;
                }
                state.lexemes.insert(lexeme.lemma.clone(), lexeme.clone());
                state.seen_in.insert(lexeme.lemma.clone(), kept.len());
                state
                    .outcome(IngestStage::ExtractCandidates)
                    .created
                    .insert(lexeme.lemma.clone());
                fresh.insert(lexeme.clone());
            }
            if !fresh.is_empty() {
                let mut candidates = candidates;
                candidates.lexemes = fresh;
                kept.push(candidates);
            }
        }
        state.chunks = kept;
        Ok(())
    }

    /// One translation call per context window, batching the window's new
    /// lemmas. The context is the window plus the one after it, so a word
    /// cut off at the window edge still translates against its sentence.
    async fn translate(&self, state: &mut RunState, src: LanguageCode, tgt: LanguageCode) {
        debug!(stage = %IngestStage::Translate, %src, %tgt, "Translating candidates");
        let mut attempted: BTreeSet<String> = BTreeSet::new();

        for index in 0..state.chunks.len() {
            let batch: Vec<String> = state.chunks[index]
                .lexemes
                .iter()
                .map(|l| l.lemma.clone())
                .filter(|lemma| attempted.insert(lemma.clone()))
                .collect();
            if batch.is_empty() {
                continue;
            }

            let mut context = state.chunks[index].span.content.clone();
            if let Some(next) = state.chunks.get(index + 1) {
                context.push(' ');
                context.push_str(&next.span.content);
            }

            match self.generator.translate(&context, &batch, src, tgt).await {
                Ok(mut translated) => {
                    for lemma in &batch {
                        match translated.remove(lemma) {
                            Some(items) if !items.is_empty() => {
                                state
                                    .outcome(IngestStage::Translate)
                                    .created
                                    .insert(lemma.clone());
                                state
                                    .translations
                                    .entry(lemma.clone())
                                    .or_default()
                                    .extend(items);
                            }
                            _ => {}
                        }
                    }
                }
                Err(err) => {
                    warn!("Translation batch of {} lemmas failed: {err}", batch.len());
                    let outcome = state.outcome(IngestStage::Translate);
                    for lemma in batch {
                        outcome.failed.insert(lemma, err.to_string());
                    }
                }
            }
        }
    }

    /// One definition call per lemma, grounded in the window it was first
    /// seen in. Independent of translation, so a lemma the translator gave
    /// up on still gets defined.
    async fn define(&self, state: &mut RunState, src: LanguageCode) {
        debug!(stage = %IngestStage::Define, "Generating definitions");
        let lemmas: Vec<String> = state.lexemes.keys().cloned().collect();

        for lemma in lemmas {
            let context = state
                .seen_in
                .get(&lemma)
                .and_then(|&i| state.chunks.get(i))
                .map(|c| c.span.content.clone());

            match self.generator.define(&lemma, src, context.as_deref()).await {
                Ok(definitions) if !definitions.is_empty() => {
                    state
                        .outcome(IngestStage::Define)
                        .created
                        .insert(lemma.clone());
                    state.definitions.insert(lemma, definitions);
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("Definition generation for '{lemma}' failed: {err}");
                    state
                        .outcome(IngestStage::Define)
                        .failed
                        .insert(lemma, err.to_string());
                }
            }
        }
    }

    /// Example sentences, conditioned on the first generated definition so
    /// they illustrate the sense in play. Without a definition the adapter
    /// falls back to the word's most common sense.
    async fn exemplify(&self, state: &mut RunState, src: LanguageCode) {
        let count = self.enrichment.examples_per_word;
        debug!(stage = %IngestStage::Exemplify, count, "Generating examples");
        if count == 0 {
            return;
        }

        let lemmas: Vec<String> = state.lexemes.keys().cloned().collect();
        for lemma in lemmas {
            let definition = state
                .definitions
                .get(&lemma)
                .and_then(|d| d.first())
                .cloned();

            match self
                .generator
                .exemplify(&lemma, src, definition.as_deref(), count)
                .await
            {
                Ok(examples) if !examples.is_empty() => {
                    state
                        .outcome(IngestStage::Exemplify)
                        .created
                        .insert(lemma.clone());
                    state.examples.insert(lemma, examples);
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("Example generation for '{lemma}' failed: {err}");
                    state
                        .outcome(IngestStage::Exemplify)
                        .failed
                        .insert(lemma, err.to_string());
                }
            }
        }
    }

    /// Nearest neighbours among the words already in the dictionary, using
    /// the configured retrieval defaults.
    async fn resolve_synonyms(
        &self,
        state: &mut RunState,
        profile: &learning_profile::Model,
        src: LanguageCode,
    ) {
        debug!(stage = %IngestStage::ResolveSynonyms, "Resolving synonyms");
        let resolver = SynonymResolver::new(self.store.clone());
        let lemmas: Vec<String> = state.lexemes.keys().cloned().collect();

        for lemma in lemmas {
            let matches = resolver
                .resolve(
                    profile.id,
                    &lemma,
                    src,
                    self.retrieval.top_k,
                    self.retrieval.min_similarity,
                )
                .await;
            match matches {
                Ok(matches) if !matches.is_empty() => {
                    state
                        .outcome(IngestStage::ResolveSynonyms)
                        .created
                        .insert(lemma.clone());
                    state
                        .synonyms
                        .insert(lemma, matches.into_iter().map(|m| m.word.lemma).collect());
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("Synonym resolution for '{lemma}' failed: {err}");
                    state
                        .outcome(IngestStage::ResolveSynonyms)
                        .failed
                        .insert(lemma, err.to_string());
                }
            }
        }
    }

    /// Persist the text row with its ordered chunks. This is the anchor for
    /// definition provenance, so a failure here aborts the run.
    async fn persist_text(
        &self,
        state: &mut RunState,
        profile: &learning_profile::Model,
        text: &str,
    ) -> Result<(), IngestError> {
        debug!(stage = %IngestStage::PersistText, "Persisting text");
        let spans = self.registry.chunk(text);
        let outcome = self
            .store
            .create_or_fetch_text(profile.id, text, &spans, profile.user_id, None)
            .await?;

        let key = "text".to_string();
        if outcome.was_created() {
            state.outcome(IngestStage::PersistText).created.insert(key);
        } else {
            state.outcome(IngestStage::PersistText).existing.insert(key);
        }
        state.text_id = Some(outcome.into_inner().id);
        Ok(())
    }

    async fn persist_words(&self, state: &mut RunState) {
        debug!(stage = %IngestStage::PersistWords, "Persisting words");
        let lexemes: Vec<_> = state.lexemes.values().cloned().collect();

        for lexeme in lexemes {
            match self
                .store
                .create_or_fetch_word(&lexeme.lemma, lexeme.language, lexeme.pos)
                .await
            {
                Ok(outcome) => {
                    let stage = state.outcome(IngestStage::PersistWords);
                    if outcome.was_created() {
                        stage.created.insert(lexeme.lemma.clone());
                    } else {
                        stage.existing.insert(lexeme.lemma.clone());
                    }
                    state.word_ids.insert(lexeme.lemma, outcome.into_inner().id);
                }
                Err(err) => {
                    warn!("Persisting word '{}' failed: {err}", lexeme.lemma);
                    state
                        .outcome(IngestStage::PersistWords)
                        .failed
                        .insert(lexeme.lemma, err.to_string());
                }
            }
        }
    }

    async fn persist_entries(&self, state: &mut RunState, profile: &learning_profile::Model) {
        debug!(stage = %IngestStage::PersistDictionaryEntries, "Persisting entries");
        let lemmas: Vec<String> = state.lexemes.keys().cloned().collect();

        for lemma in lemmas {
            // A lemma whose word row failed is already in that stage's
            // failed set; there is nothing to bind here.
            let Some(&word_id) = state.word_ids.get(&lemma) else {
                continue;
            };

            match self
                .store
                .create_or_fetch_entry(profile.id, word_id, profile.user_id, None)
                .await
            {
                Ok(outcome) => {
                    let stage = state.outcome(IngestStage::PersistDictionaryEntries);
                    if outcome.was_created() {
                        stage.created.insert(lemma.clone());
                    } else {
                        stage.existing.insert(lemma.clone());
                    }
                    state.entry_ids.insert(lemma, outcome.into_inner().id);
                }
                Err(err) => {
                    warn!("Persisting entry for '{lemma}' failed: {err}");
                    state
                        .outcome(IngestStage::PersistDictionaryEntries)
                        .failed
                        .insert(lemma, err.to_string());
                }
            }
        }
    }

    async fn persist_translations(
        &self,
        state: &mut RunState,
        profile: &learning_profile::Model,
        tgt: LanguageCode,
    ) {
        debug!(stage = %IngestStage::PersistTranslations, "Persisting translations");
        let items: Vec<(String, Vec<String>)> = state
            .translations
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (lemma, translations) in items {
            let Some(&entry_id) = state.entry_ids.get(&lemma) else {
                continue;
            };
            let mut error = None;
            for content in &translations {
                if let Err(err) = self
                    .store
                    .create_translation(entry_id, tgt, content, profile.user_id)
                    .await
                {
                    warn!("Persisting translation of '{lemma}' failed: {err}");
                    error = Some(err.to_string());
                }
            }
            let stage = state.outcome(IngestStage::PersistTranslations);
            match error {
                Some(message) => {
                    stage.failed.insert(lemma, message);
                }
                None => {
                    stage.created.insert(lemma);
                }
            }
        }
    }

    async fn persist_definitions(
        &self,
        state: &mut RunState,
        profile: &learning_profile::Model,
        src: LanguageCode,
    ) {
        debug!(stage = %IngestStage::PersistDefinitions, "Persisting definitions");
        let items: Vec<(String, Vec<String>)> = state
            .definitions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let source_text_id = state.text_id;

        for (lemma, definitions) in items {
            let Some(&entry_id) = state.entry_ids.get(&lemma) else {
                continue;
            };
            let mut error = None;
            for content in &definitions {
                if let Err(err) = self
                    .store
                    .create_definition(entry_id, src, content, source_text_id, profile.user_id)
                    .await
                {
                    warn!("Persisting definition of '{lemma}' failed: {err}");
                    error = Some(err.to_string());
                }
            }
            let stage = state.outcome(IngestStage::PersistDefinitions);
            match error {
                Some(message) => {
                    stage.failed.insert(lemma, message);
                }
                None => {
                    stage.created.insert(lemma);
                }
            }
        }
    }

    async fn persist_examples(
        &self,
        state: &mut RunState,
        profile: &learning_profile::Model,
        src: LanguageCode,
    ) {
        debug!(stage = %IngestStage::PersistExamples, "Persisting examples");
        let items: Vec<(String, Vec<String>)> = state
            .examples
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        for (lemma, examples) in items {
            let Some(&entry_id) = state.entry_ids.get(&lemma) else {
                continue;
            };
            let mut error = None;
            for content in &examples {
                if let Err(err) = self
                    .store
                    .create_example(entry_id, src, content, profile.user_id)
                    .await
                {
                    warn!("Persisting example of '{lemma}' failed: {err}");
                    error = Some(err.to_string());
                }
            }
            let stage = state.outcome(IngestStage::PersistExamples);
            match error {
                Some(message) => {
                    stage.failed.insert(lemma, message);
                }
                None => {
                    stage.created.insert(lemma);
                }
            }
        }
    }
}
