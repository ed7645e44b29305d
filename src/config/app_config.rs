//! Application configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CONFIG_FILE: &str = "lexicon.json";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config schema version
    pub version: u32,

    /// Data directory path
    pub data_dir: PathBuf,

    /// Logging level
    pub log_level: String,

    /// Text chunking parameters
    pub chunking: ChunkingConfig,

    /// Enrichment (generation) parameters
    pub enrichment: EnrichmentConfig,

    /// Similarity retrieval defaults
    pub retrieval: RetrievalConfig,
}

/// How raw text is split into context windows before lemmatization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Character overlap between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Example sentences requested per word when no per-word count is given
    pub examples_per_word: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            examples_per_word: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default number of neighbors returned by the synonym resolver
    pub top_k: usize,
    /// Default similarity floor in [0, 1]
    pub min_similarity: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_similarity: 0.7,
        }
    }
}

impl AppConfig {
    /// Load configuration from a data directory, creating a default config
    /// file if none exists yet.
    pub fn load_from(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE);

        if config_path.exists() {
            info!("Loading config from {:?}", config_path);
            let json = fs::read_to_string(&config_path)?;
            let config: AppConfig = serde_json::from_str(&json)?;
            Ok(config)
        } else {
            warn!("No config found, creating default at {:?}", config_path);
            let config = Self::default_with_dir(data_dir.to_path_buf());
            config.save()?;
            Ok(config)
        }
    }

    /// Create default configuration with a specific data directory
    pub fn default_with_dir(data_dir: PathBuf) -> Self {
        Self {
            version: Self::target_version(),
            data_dir,
            log_level: "info".to_string(),
            chunking: ChunkingConfig::default(),
            enrichment: EnrichmentConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let config_path = self.data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, json)?;
        Ok(())
    }

    /// Path of the sqlite database inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("lexicon.db")
    }

    fn target_version() -> u32 {
        1
    }
}
