//! Per-language text normalization
//!
//! Turns raw text into ordered context windows, each carrying the set of
//! candidate lexemes found inside it. Backends are selected through a
//! language lookup table built at startup; languages without a backend go
//! through the whitespace fallback. The whole stage is a pure function over
//! the text: dictionary dedup happens in the pipeline, which owns the
//! store handle.

mod backends;
mod chunker;
mod tags;

pub use backends::{EnglishBackend, WhitespaceBackend};
pub use chunker::TextChunker;
pub use tags::map_english_tag;

use crate::config::ChunkingConfig;
use crate::shared::{LanguageCode, Lexeme, TextSpan};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// A language-specific tokenizer/lemmatizer/tagger.
///
/// Implementations must emit lexemes already mapped into the shared
/// [`crate::shared::PartOfSpeech`] vocabulary.
pub trait NormalizerBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Extract lexemes from one chunk of text.
    fn lexemes(&self, chunk: &str, language: LanguageCode) -> Vec<Lexeme>;
}

/// One context window and the candidate lexemes found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkCandidates {
    pub span: TextSpan,
    pub lexemes: BTreeSet<Lexeme>,
}

/// Language → backend dispatch table plus the shared chunker.
pub struct NormalizerRegistry {
    backends: HashMap<LanguageCode, Arc<dyn NormalizerBackend>>,
    fallback: Arc<dyn NormalizerBackend>,
    chunker: TextChunker,
}

impl NormalizerRegistry {
    /// Registry with the built-in English backend and the whitespace
    /// fallback for every other language.
    pub fn with_defaults(chunking: &ChunkingConfig) -> Self {
        let mut registry = Self {
            backends: HashMap::new(),
            fallback: Arc::new(WhitespaceBackend),
            chunker: TextChunker::new(chunking.chunk_size, chunking.chunk_overlap),
        };
        registry.register(LanguageCode::En, Arc::new(EnglishBackend::new()));
        registry
    }

    /// Register (or replace) the backend for a language.
    pub fn register(&mut self, language: LanguageCode, backend: Arc<dyn NormalizerBackend>) {
        self.backends.insert(language, backend);
    }

    fn backend_for(&self, language: LanguageCode) -> &dyn NormalizerBackend {
        self.backends
            .get(&language)
            .map(|b| b.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    /// Split `text` into its overlapping context windows without running a
    /// backend. This is what gets persisted as chunk rows.
    pub fn chunk(&self, text: &str) -> Vec<TextSpan> {
        self.chunker.split(text)
    }

    /// Split `text` into overlapping context windows and extract the lexeme
    /// set of each. Windows that yield no lexemes are dropped.
    pub fn extract(&self, text: &str, language: LanguageCode) -> Vec<ChunkCandidates> {
        let backend = self.backend_for(language);
        debug!(
            backend = backend.name(),
            %language,
            "Normalizing {} characters",
            text.chars().count()
        );

        self.chunker
            .split(text)
            .into_iter()
            .filter_map(|span| {
                let lexemes: BTreeSet<Lexeme> =
                    backend.lexemes(&span.content, language).into_iter().collect();
                if lexemes.is_empty() {
                    None
                } else {
                    Some(ChunkCandidates { span, lexemes })
                }
            })
            .collect()
    }
}
