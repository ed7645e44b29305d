//! Normalizer backends
//!
//! The English backend is a rule lemmatizer/tagger: a function-word lexicon
//! plus suffix heuristics, tagging with Penn-style labels that the fixed
//! lookup table folds into the shared vocabulary. The whitespace backend
//! serves every language without a dedicated backend: alphabetic tokens,
//! lowercased, unknown part of speech.

use super::tags::map_english_tag;
use super::NormalizerBackend;
use crate::shared::{LanguageCode, Lexeme, PartOfSpeech};
use std::collections::HashMap;

/// Strip non-alphabetic edges; None unless the remainder is alphabetic.
fn alphabetic_token(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphabetic());
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_alphabetic()) {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Fallback for languages without a registered backend.
pub struct WhitespaceBackend;

impl NormalizerBackend for WhitespaceBackend {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn lexemes(&self, chunk: &str, language: LanguageCode) -> Vec<Lexeme> {
        chunk
            .split_whitespace()
            .filter_map(alphabetic_token)
            .map(|token| Lexeme::new(token, PartOfSpeech::Other, language))
            .collect()
    }
}

/// Rule-based English lemmatizer and tagger.
pub struct EnglishBackend {
    function_words: HashMap<&'static str, &'static str>,
}

const FUNCTION_WORDS: &[(&str, &str)] = &[
    // Determiners
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("that", "DT"),
    ("these", "DT"), ("those", "DT"), ("each", "DT"), ("every", "DT"), ("some", "DT"),
    ("any", "DT"), ("no", "DT"),
    // Pronouns
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"),
    ("we", "PRP"), ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("her", "PRP"),
    ("us", "PRP"), ("them", "PRP"), ("my", "PRP"), ("your", "PRP"), ("his", "PRP"),
    ("its", "PRP"), ("our", "PRP"), ("their", "PRP"), ("who", "PRP"), ("what", "PRP"),
    // Adpositions
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"),
    ("for", "IN"), ("with", "IN"), ("from", "IN"), ("to", "IN"), ("into", "IN"),
    ("over", "IN"), ("under", "IN"), ("about", "IN"), ("during", "IN"), ("through", "IN"),
    // Conjunctions
    ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"), ("so", "CC"), ("yet", "CC"),
    // Auxiliaries and modals
    ("is", "MD"), ("am", "MD"), ("are", "MD"), ("was", "MD"), ("were", "MD"),
    ("be", "MD"), ("been", "MD"), ("being", "MD"), ("do", "MD"), ("does", "MD"),
    ("did", "MD"), ("have", "MD"), ("has", "MD"), ("had", "MD"), ("will", "MD"),
    ("would", "MD"), ("can", "MD"), ("could", "MD"), ("shall", "MD"), ("should", "MD"),
    ("may", "MD"), ("might", "MD"), ("must", "MD"),
    // Interjections
    ("hello", "UH"), ("hi", "UH"), ("hey", "UH"), ("oh", "UH"), ("wow", "UH"),
    ("yes", "UH"), ("please", "UH"), ("thanks", "UH"), ("goodbye", "UH"),
    // Common adverbs that no suffix rule catches
    ("again", "RB"), ("always", "RB"), ("never", "RB"), ("often", "RB"),
    ("soon", "RB"), ("too", "RB"), ("very", "RB"), ("well", "RB"), ("also", "RB"),
    ("now", "RB"), ("then", "RB"), ("here", "RB"), ("there", "RB"), ("not", "RB"),
];

impl EnglishBackend {
    pub fn new() -> Self {
        Self {
            function_words: FUNCTION_WORDS.iter().copied().collect(),
        }
    }

    /// Lemma and Penn-style label for one lowercased token.
    fn analyze(&self, token: &str) -> (String, &'static str) {
        if let Some(&tag) = self.function_words.get(token) {
            return (token.to_string(), tag);
        }

        if token.len() > 4 && token.ends_with("ly") {
            return (token.to_string(), "RB");
        }
        if token.len() > 5 && token.ends_with("ing") {
            return (strip_doubled(&token[..token.len() - 3]), "VBG");
        }
        if token.len() > 4 && token.ends_with("ed") {
            let stem = &token[..token.len() - 2];
            if let Some(base) = stem.strip_suffix('i') {
                return (format!("{}y", base), "VBD");
            }
            return (strip_doubled(stem), "VBD");
        }
        if token.len() > 3 && token.ends_with("ies") {
            return (format!("{}y", &token[..token.len() - 3]), "NNS");
        }
        if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
            return (token[..token.len() - 1].to_string(), "NNS");
        }
        (token.to_string(), "NN")
    }
}

impl Default for EnglishBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// "runn" → "run", "stopp" → "stop"; stems without a doubled final
/// consonant pass through unchanged.
fn strip_doubled(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() >= 2 {
        let last = chars[chars.len() - 1];
        if last == chars[chars.len() - 2] && !"aeiou".contains(last) {
            return chars[..chars.len() - 1].iter().collect();
        }
    }
    stem.to_string()
}

impl NormalizerBackend for EnglishBackend {
    fn name(&self) -> &'static str {
        "english-rules"
    }

    fn lexemes(&self, chunk: &str, language: LanguageCode) -> Vec<Lexeme> {
        chunk
            .split_whitespace()
            .filter_map(alphabetic_token)
            .map(|token| {
                let (lemma, tag) = self.analyze(&token);
                Lexeme::new(lemma, map_english_tag(tag), language)
            })
            .collect()
    }
}
