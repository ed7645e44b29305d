//! Types shared across the normalizer, pipeline and store layers

pub mod types;
pub mod vector;

pub use types::{LanguageCode, Lexeme, PartOfSpeech, TextSpan};
pub use vector::{cosine_distance, cosine_similarity};
