//! Overlapping context windows over raw text
//!
//! Splits text into chunks of bounded character length with bounded
//! overlap, preferring to break at paragraph, sentence and clause
//! boundaries over arbitrary cut points. The overlap keeps a lemma near a
//! chunk boundary inside at least one window with its surrounding context.

use crate::shared::TextSpan;

/// Break-point candidates in priority order. A chunk is cut after the
/// highest-priority separator found in the back half of the window.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "! ", "? ", ", ", " "];

#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Overlap is clamped below the chunk size so progress is guaranteed.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size.saturating_sub(1)),
        }
    }

    /// Split into ordered spans with character offsets into `text`.
    /// Whitespace-only spans are dropped; a short text yields one span.
    pub fn split(&self, text: &str) -> Vec<TextSpan> {
        let chars: Vec<char> = text.chars().collect();
        let mut spans = Vec::new();
        let mut pos = 0;

        while pos < chars.len() {
            let window_end = (pos + self.chunk_size).min(chars.len());
            let cut = if window_end == chars.len() {
                window_end
            } else {
                self.break_point(&chars, pos, window_end)
            };

            if let Some(span) = trimmed_span(&chars, pos, cut) {
                spans.push(span);
            }

            if cut >= chars.len() {
                break;
            }
            let next = cut.saturating_sub(self.overlap);
            // Never move backwards, even when the overlap swallows the
            // whole chunk we just emitted.
            pos = if next > pos { next } else { cut };
        }

        spans
    }

    /// Best cut point in (pos, window_end]. Only the back half of the
    /// window is searched so chunks stay reasonably full; without any
    /// separator there, the cut is a hard one at the window end.
    fn break_point(&self, chars: &[char], pos: usize, window_end: usize) -> usize {
        let floor = pos + self.chunk_size / 2;
        for sep in SEPARATORS {
            let sep_chars: Vec<char> = sep.chars().collect();
            let mut idx = window_end.saturating_sub(sep_chars.len());
            while idx > floor {
                if chars[idx..].starts_with(&sep_chars) {
                    return idx + sep_chars.len();
                }
                idx -= 1;
            }
        }
        window_end
    }
}

/// Trim whitespace off both ends of `chars[start..end]`, adjusting offsets.
fn trimmed_span(chars: &[char], start: usize, end: usize) -> Option<TextSpan> {
    let mut s = start;
    let mut e = end;
    while s < e && chars[s].is_whitespace() {
        s += 1;
    }
    while e > s && chars[e - 1].is_whitespace() {
        e -= 1;
    }
    if s == e {
        return None;
    }
    Some(TextSpan {
        content: chars[s..e].iter().collect(),
        start: s,
        end: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_span() {
        let spans = TextChunker::new(300, 100).split("Hello world.");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "Hello world.");
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 12);
    }

    #[test]
    fn spans_respect_the_size_bound() {
        let text = "word ".repeat(200);
        for span in TextChunker::new(50, 10).split(&text) {
            assert!(span.content.chars().count() <= 50, "span too long");
        }
    }

    #[test]
    fn offsets_index_back_into_the_text() {
        let text = "First sentence here. Second sentence follows. Third one ends it.";
        let chars: Vec<char> = text.chars().collect();
        for span in TextChunker::new(30, 10).split(text) {
            let slice: String = chars[span.start..span.end].iter().collect();
            assert_eq!(slice, span.content);
        }
    }

    #[test]
    fn consecutive_spans_overlap() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let spans = TextChunker::new(25, 10).split(text);
        assert!(spans.len() > 1);
        for pair in spans.windows(2) {
            assert!(
                pair[1].start < pair[0].end,
                "expected overlap between consecutive spans"
            );
        }
    }

    #[test]
    fn breaks_prefer_sentence_boundaries() {
        let text = "One two three four. Five six seven eight nine ten eleven.";
        let spans = TextChunker::new(30, 5).split(text);
        assert!(spans[0].content.ends_with('.'), "got: {:?}", spans[0].content);
    }

    #[test]
    fn whitespace_only_text_yields_nothing() {
        assert!(TextChunker::new(300, 100).split("   \n\n  ").is_empty());
    }

    #[test]
    fn pathological_overlap_still_makes_progress() {
        let text = "abcdef ".repeat(100);
        let spans = TextChunker::new(10, 9).split(&text);
        assert!(!spans.is_empty());
        for pair in spans.windows(2) {
            assert!(pair[1].start > pair[0].start);
        }
    }
}
