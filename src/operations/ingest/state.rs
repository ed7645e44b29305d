//! Mutable run state threaded through the pipeline stages

use crate::normalizer::ChunkCandidates;
use crate::shared::Lexeme;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use strum::Display;

/// The fixed stage sequence. Stages always run in declaration order;
/// generation stages tolerate per-item failure, so a run reaches `Done`
/// regardless of how many individual lemmas fell over on the way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display,
)]
pub enum IngestStage {
    ExtractCandidates,
    Translate,
    Define,
    Exemplify,
    ResolveSynonyms,
    PersistText,
    PersistWords,
    PersistDictionaryEntries,
    PersistTranslations,
    PersistDefinitions,
    PersistExamples,
    Done,
}

/// Per-stage bookkeeping, keyed by lemma. After a persistence stage every
/// lemma that entered it sits in exactly one of the three sets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageOutcome {
    /// Rows (or artifacts) newly written for these lemmas
    pub created: BTreeSet<String>,
    /// The row already existed; nothing was written
    pub existing: BTreeSet<String>,
    /// Lemma → error message for items that failed inside the stage
    pub failed: BTreeMap<String, String>,
}

impl StageOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Everything the stages accumulate while a run is in flight.
#[derive(Default)]
pub(super) struct RunState {
    /// Context windows that still carry candidates after dictionary dedup
    pub chunks: Vec<ChunkCandidates>,
    /// How many windows the chunker produced before dedup
    pub chunk_count: usize,
    /// Lemma → full lexeme for every candidate in the run
    pub lexemes: BTreeMap<String, Lexeme>,
    /// Lemma → index into `chunks` of the window it was first seen in
    pub seen_in: HashMap<String, usize>,
    pub translations: BTreeMap<String, Vec<String>>,
    pub definitions: BTreeMap<String, Vec<String>>,
    pub examples: BTreeMap<String, Vec<String>>,
    /// Lemma → lemmas of similar words already in the dictionary
    pub synonyms: BTreeMap<String, Vec<String>>,
    pub word_ids: HashMap<String, i32>,
    pub entry_ids: HashMap<String, i32>,
    pub text_id: Option<i32>,
    pub outcomes: BTreeMap<IngestStage, StageOutcome>,
}

impl RunState {
    pub fn outcome(&mut self, stage: IngestStage) -> &mut StageOutcome {
        self.outcomes.entry(stage).or_default()
    }

    pub fn into_report(self) -> IngestReport {
        IngestReport {
            text_id: self.text_id,
            chunk_count: self.chunk_count,
            candidates: self.lexemes.keys().cloned().collect(),
            synonyms: self.synonyms,
            outcomes: self.outcomes,
        }
    }
}

/// What a finished run looks like to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Row id of the persisted text, if the persistence stage reached it
    pub text_id: Option<i32>,
    /// Number of context windows the text was split into
    pub chunk_count: usize,
    /// Every new lemma the run worked on, sorted
    pub candidates: Vec<String>,
    /// Lemma → similar dictionary lemmas found during the run
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Per-stage outcome sets
    pub outcomes: BTreeMap<IngestStage, StageOutcome>,
}

impl IngestReport {
    /// Lemmas that failed in at least one stage.
    pub fn failed_lemmas(&self) -> BTreeSet<&str> {
        self.outcomes
            .values()
            .flat_map(|o| o.failed.keys().map(String::as_str))
            .collect()
    }

    pub fn outcome(&self, stage: IngestStage) -> Option<&StageOutcome> {
        self.outcomes.get(&stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_order_by_declaration() {
        assert!(IngestStage::ExtractCandidates < IngestStage::Translate);
        assert!(IngestStage::Translate < IngestStage::Define);
        assert!(IngestStage::Define < IngestStage::Exemplify);
        assert!(IngestStage::Exemplify < IngestStage::ResolveSynonyms);
        assert!(IngestStage::ResolveSynonyms < IngestStage::PersistText);
        assert!(IngestStage::PersistExamples < IngestStage::Done);
    }

    #[test]
    fn empty_outcome_is_clean() {
        let mut outcome = StageOutcome::default();
        assert!(outcome.is_clean());
        outcome.failed.insert("word".into(), "boom".into());
        assert!(!outcome.is_clean());
    }
}
