//! Shared fixtures for the integration tests: an in-memory lexicon wired to
//! deterministic mock adapters.

#![allow(dead_code)]

use async_trait::async_trait;
use lexicon_core::config::AppConfig;
use lexicon_core::infrastructure::adapters::{
    AdapterError, Embedding, EmbeddingAdapter, GenerationAdapter,
};
use lexicon_core::infrastructure::database::entities::{learning_profile, user};
use lexicon_core::shared::vector::l2_normalize;
use lexicon_core::shared::LanguageCode;
use lexicon_core::Lexicon;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const DIMS: usize = 8;

/// Deterministic embedder: hashes the text into a unit vector, with an
/// override table for tests that need controlled geometry.
pub struct MockEmbedder {
    overrides: Mutex<HashMap<String, Vec<f32>>>,
    fail_texts: Mutex<HashSet<String>>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            overrides: Mutex::new(HashMap::new()),
            fail_texts: Mutex::new(HashSet::new()),
        }
    }

    /// Pin the vector returned for `text`. Normalized on the way in.
    pub fn set(&self, text: &str, mut vector: Vec<f32>) {
        l2_normalize(&mut vector);
        self.overrides
            .lock()
            .unwrap()
            .insert(text.to_string(), vector);
    }

    /// Make embedding of `text` fail with an adapter error.
    pub fn fail_on(&self, text: &str) {
        self.fail_texts.lock().unwrap().insert(text.to_string());
    }

    fn hash_vector(text: &str) -> Vec<f32> {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in text.bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        }
        let mut v = Vec::with_capacity(DIMS);
        for _ in 0..DIMS {
            h = h.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            v.push(((h >> 33) as f32 / (1u64 << 31) as f32) - 1.0);
        }
        l2_normalize(&mut v);
        v
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, AdapterError> {
        if self.fail_texts.lock().unwrap().contains(text) {
            return Err(AdapterError::Embedding(format!(
                "mock embedder refused '{text}'"
            )));
        }
        let vector = self
            .overrides
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| Self::hash_vector(text));
        Ok(Embedding {
            vector,
            model: "mock-embedder-v1".to_string(),
        })
    }

    fn model_id(&self) -> &str {
        "mock-embedder-v1"
    }
}

/// Deterministic generator. Translations, definitions and examples are
/// templated from the input so assertions can predict them; individual words
/// can be made to fail per operation.
pub struct MockGenerator {
    fail_translate: HashSet<String>,
    fail_define: HashSet<String>,
    /// (word, definition) pairs seen by `exemplify`
    pub exemplify_calls: Mutex<Vec<(String, Option<String>)>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            fail_translate: HashSet::new(),
            fail_define: HashSet::new(),
            exemplify_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_translate(mut self, word: &str) -> Self {
        self.fail_translate.insert(word.to_string());
        self
    }

    pub fn failing_define(mut self, word: &str) -> Self {
        self.fail_define.insert(word.to_string());
        self
    }
}

#[async_trait]
impl GenerationAdapter for MockGenerator {
    async fn translate(
        &self,
        _context: &str,
        words: &[String],
        _src_language: LanguageCode,
        tgt_language: LanguageCode,
    ) -> Result<HashMap<String, Vec<String>>, AdapterError> {
        if let Some(word) = words.iter().find(|w| self.fail_translate.contains(*w)) {
            return Err(AdapterError::Generation(format!(
                "mock generator refused to translate '{word}'"
            )));
        }
        Ok(words
            .iter()
            .map(|w| (w.clone(), vec![format!("{w}-{tgt_language}")]))
            .collect())
    }

    async fn define(
        &self,
        word: &str,
        _language: LanguageCode,
        _context: Option<&str>,
    ) -> Result<Vec<String>, AdapterError> {
        if self.fail_define.contains(word) {
            return Err(AdapterError::Generation(format!(
                "mock generator refused to define '{word}'"
            )));
        }
        Ok(vec![format!("meaning of {word}")])
    }

    async fn exemplify(
        &self,
        word: &str,
        _language: LanguageCode,
        definition: Option<&str>,
        count: usize,
    ) -> Result<Vec<String>, AdapterError> {
        self.exemplify_calls
            .lock()
            .unwrap()
            .push((word.to_string(), definition.map(str::to_string)));
        Ok((0..count)
            .map(|i| format!("Sentence {i} using {word}."))
            .collect())
    }
}

pub struct TestContext {
    pub lexicon: Lexicon,
    pub embedder: Arc<MockEmbedder>,
    pub generator: Arc<MockGenerator>,
}

pub async fn lexicon() -> TestContext {
    lexicon_with(MockGenerator::new()).await
}

pub async fn lexicon_with(generator: MockGenerator) -> TestContext {
    let embedder = Arc::new(MockEmbedder::new());
    let generator = Arc::new(generator);
    let config = AppConfig::default_with_dir(std::env::temp_dir().join("lexicon-test"));
    let lexicon = Lexicon::new_in_memory(config, embedder.clone(), generator.clone())
        .await
        .unwrap();
    TestContext {
        lexicon,
        embedder,
        generator,
    }
}

/// A registered user with an active En → Es learning profile.
pub async fn user_with_profile(
    ctx: &TestContext,
    username: &str,
) -> (user::Model, learning_profile::Model) {
    let store = ctx.lexicon.store();
    let user = store
        .register_user(username, &format!("{username}@example.com"), username)
        .await
        .unwrap();
    let profile = store
        .create_learning_profile(user.id, LanguageCode::En, LanguageCode::Es, true)
        .await
        .unwrap();
    (user, profile)
}
