//! High-level operations built on top of the store
//!
//! - `ingest`: the staged pipeline that turns a submitted text into
//!   dictionary entries with their enrichment artifacts
//! - `synonyms`: vector-similarity retrieval over a profile's dictionary

pub mod ingest;
pub mod synonyms;

pub use ingest::{IngestError, IngestPipeline, IngestReport, IngestStage, StageOutcome};
pub use synonyms::{SynonymMatch, SynonymResolver};
