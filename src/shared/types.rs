//! Core vocabulary types
//!
//! `LanguageCode` and `PartOfSpeech` are the two shared vocabularies of the
//! system: every backend-specific tagger output is mapped into them, and the
//! database stores them as their stable integer/string forms.

use int_enum::IntEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// ISO 639-1 codes for the supported languages.
///
/// Languages without a registered normalizer backend still get a code here;
/// ingestion for them goes through the whitespace fallback backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Ru,
    Ko,
    Zh,
    Ja,
    Es,
    Fr,
    De,
    It,
    Pt,
}

impl LanguageCode {
    /// Two-letter code as stored in the `languages` table.
    pub fn code(&self) -> String {
        self.to_string()
    }

    /// Human-readable name in the language itself, used when talking to the
    /// generation adapter (models disambiguate better on native names than
    /// on ISO codes).
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ru => "Русский",
            Self::Ko => "한국어",
            Self::Zh => "中文",
            Self::Ja => "日本語",
            Self::Es => "Español",
            Self::Fr => "Français",
            Self::De => "Deutsch",
            Self::It => "Italiano",
            Self::Pt => "Português",
        }
    }
}

/// Shared part-of-speech vocabulary (UPOS-style).
///
/// Backend tag sets are mapped into this enum through fixed lookup tables;
/// anything a table does not know collapses to [`PartOfSpeech::Other`]
/// instead of failing the run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, IntEnum,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[repr(i32)]
pub enum PartOfSpeech {
    Noun = 0,
    Verb = 1,
    Adj = 2,
    Adv = 3,
    Pron = 4,
    Det = 5,
    Adp = 6,
    Num = 7,
    Cconj = 8,
    Sconj = 9,
    Part = 10,
    Intj = 11,
    Propn = 12,
    Aux = 13,
    Punct = 14,
    Sym = 15,
    Other = 16,
}

impl PartOfSpeech {
    /// Open-class tags that carry standalone meaning. Callers that want to
    /// narrow a candidate set before enrichment filter on this.
    pub fn is_content_word(&self) -> bool {
        matches!(self, Self::Noun | Self::Verb | Self::Adj | Self::Adv | Self::Propn)
    }
}

/// One deduplicated lexical unit emitted by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lexeme {
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub language: LanguageCode,
}

impl Lexeme {
    pub fn new(lemma: impl Into<String>, pos: PartOfSpeech, language: LanguageCode) -> Self {
        Self {
            lemma: lemma.into(),
            pos,
            language,
        }
    }
}

/// A contiguous span of a parent text with character offsets.
///
/// Produced by the chunker and persisted as the text's chunk rows; offsets
/// index into the parent's character sequence, not its byte sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub content: String,
    pub start: usize,
    pub end: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip() {
        use std::str::FromStr;
        for lang in [LanguageCode::En, LanguageCode::Ko, LanguageCode::Pt] {
            let code = lang.code();
            assert_eq!(code.len(), 2);
            assert_eq!(LanguageCode::from_str(&code).unwrap(), lang);
        }
    }

    #[test]
    fn pos_integer_mapping_is_stable() {
        assert_eq!(i32::from(PartOfSpeech::Noun), 0);
        assert_eq!(i32::from(PartOfSpeech::Other), 16);
        assert_eq!(PartOfSpeech::try_from(11).unwrap(), PartOfSpeech::Intj);
        assert!(PartOfSpeech::try_from(99).is_err());
    }

    #[test]
    fn content_word_classification() {
        assert!(PartOfSpeech::Noun.is_content_word());
        assert!(PartOfSpeech::Verb.is_content_word());
        assert!(!PartOfSpeech::Det.is_content_word());
        assert!(!PartOfSpeech::Other.is_content_word());
    }
}
