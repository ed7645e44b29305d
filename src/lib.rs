//! Lexicon Core
//!
//! A per-user vocabulary store: texts come in, get normalized into
//! deduplicated lemma/part-of-speech units, enriched through external
//! embedding and generation services, and persisted idempotently into a
//! per-profile dictionary that supports vector-similarity synonym lookup.

pub mod config;
pub mod infrastructure;
pub mod normalizer;
pub mod operations;
pub mod shared;
pub mod store;

use crate::config::AppConfig;
use crate::infrastructure::adapters::{EmbeddingAdapter, GenerationAdapter};
use crate::infrastructure::database::Database;
use crate::normalizer::NormalizerRegistry;
use crate::operations::{IngestPipeline, SynonymResolver};
use crate::store::LexicalStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub use operations::{IngestError, IngestReport, IngestStage, StageOutcome, SynonymMatch};
pub use store::{CreateOutcome, StoreError};

/// The main context for all vocabulary operations.
///
/// Owns the database, the store and the normalizer registry; the enrichment
/// adapters are injected by the caller, which owns their lifecycle.
pub struct Lexicon {
    config: AppConfig,
    database: Database,
    store: LexicalStore,
    pipeline: IngestPipeline,
}

impl Lexicon {
    /// Open (or create) the data directory and bring the database up to the
    /// current schema.
    pub async fn new(
        data_dir: PathBuf,
        embedder: Arc<dyn EmbeddingAdapter>,
        generator: Arc<dyn GenerationAdapter>,
    ) -> Result<Self, anyhow::Error> {
        info!("Initializing lexicon core at {:?}", data_dir);

        let config = AppConfig::load_from(&data_dir)?;
        let database = Database::create(&config.database_path()).await?;
        database.migrate().await?;

        Ok(Self::assemble(config, database, embedder, generator))
    }

    /// In-memory variant for tests and throwaway sessions.
    pub async fn new_in_memory(
        config: AppConfig,
        embedder: Arc<dyn EmbeddingAdapter>,
        generator: Arc<dyn GenerationAdapter>,
    ) -> Result<Self, anyhow::Error> {
        let database = Database::open_in_memory().await?;
        database.migrate().await?;
        Ok(Self::assemble(config, database, embedder, generator))
    }

    fn assemble(
        config: AppConfig,
        database: Database,
        embedder: Arc<dyn EmbeddingAdapter>,
        generator: Arc<dyn GenerationAdapter>,
    ) -> Self {
        let store = LexicalStore::new(database.conn().clone(), embedder);
        let registry = Arc::new(NormalizerRegistry::with_defaults(&config.chunking));
        let pipeline = IngestPipeline::new(store.clone(), generator, registry, &config);

        Self {
            config,
            database,
            store,
            pipeline,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Direct access to the persistence layer.
    pub fn store(&self) -> &LexicalStore {
        &self.store
    }

    /// The staged ingestion pipeline.
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.pipeline
    }

    /// A synonym resolver over this lexicon's store.
    pub fn synonyms(&self) -> SynonymResolver {
        SynonymResolver::new(self.store.clone())
    }
}

/// Install the process-wide tracing subscriber, filtered through
/// `RUST_LOG` with the configured level as fallback.
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
