//! Backend tag → shared vocabulary mapping
//!
//! Each backend tags with its own label set; a fixed lookup table per
//! backend folds those labels into [`PartOfSpeech`]. Labels a table does
//! not know map to [`PartOfSpeech::Other`] rather than failing.

use crate::shared::PartOfSpeech;

/// Penn Treebank-style labels emitted by the English backend.
const ENGLISH_TAG_MAP: &[(&str, PartOfSpeech)] = &[
    ("NN", PartOfSpeech::Noun),
    ("NNS", PartOfSpeech::Noun),
    ("NNP", PartOfSpeech::Propn),
    ("VB", PartOfSpeech::Verb),
    ("VBD", PartOfSpeech::Verb),
    ("VBG", PartOfSpeech::Verb),
    ("MD", PartOfSpeech::Aux),
    ("JJ", PartOfSpeech::Adj),
    ("RB", PartOfSpeech::Adv),
    ("PRP", PartOfSpeech::Pron),
    ("DT", PartOfSpeech::Det),
    ("IN", PartOfSpeech::Adp),
    ("CD", PartOfSpeech::Num),
    ("CC", PartOfSpeech::Cconj),
    ("UH", PartOfSpeech::Intj),
];

/// Map an English backend label into the shared vocabulary.
pub fn map_english_tag(label: &str) -> PartOfSpeech {
    ENGLISH_TAG_MAP
        .iter()
        .find(|(tag, _)| *tag == label)
        .map(|(_, pos)| *pos)
        .unwrap_or(PartOfSpeech::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_into_the_shared_vocabulary() {
        assert_eq!(map_english_tag("NN"), PartOfSpeech::Noun);
        assert_eq!(map_english_tag("VBG"), PartOfSpeech::Verb);
        assert_eq!(map_english_tag("UH"), PartOfSpeech::Intj);
    }

    #[test]
    fn unknown_labels_fall_back_to_other() {
        assert_eq!(map_english_tag("FW"), PartOfSpeech::Other);
        assert_eq!(map_english_tag(""), PartOfSpeech::Other);
    }
}
