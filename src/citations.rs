//! Inline citation markers in search summaries.
//!
//! Summary text refers to sources with 1-based `[N]` markers. Markers that
//! point inside the source list become references; anything else stays as
//! literal text.

use once_cell::sync::Lazy;
use regex::Regex;

static CITATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("Invalid citation regex pattern"));

/// A piece of summary text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationSegment {
    /// Literal text, verbatim
    Text(String),
    /// A resolved marker; `index` is 0-based into the source list
    Reference { index: usize, marker: String },
}

/// Split `text` into literal and reference segments in original order.
///
/// A marker `[N]` resolves only when `N - 1 < source_count`; otherwise the
/// bracketed text is emitted as its own literal segment.
pub fn split_citations(text: &str, source_count: usize) -> Vec<CitationSegment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for captures in CITATION_REGEX.captures_iter(text) {
        let (Some(whole), Some(number)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        if whole.start() > last_end {
            segments.push(CitationSegment::Text(
                text[last_end..whole.start()].to_string(),
            ));
        }

        let index = number
            .as_str()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|i| *i < source_count);

        segments.push(match index {
            Some(index) => CitationSegment::Reference {
                index,
                marker: whole.as_str().to_string(),
            },
            None => CitationSegment::Text(whole.as_str().to_string()),
        });

        last_end = whole.end();
    }

    if last_end < text.len() {
        segments.push(CitationSegment::Text(text[last_end..].to_string()));
    }

    segments
}

/// Set of source indices whose preview is currently expanded.
///
/// Indices are kept in the order they were first expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedCitations {
    indices: Vec<usize>,
}

impl ExpandedCitations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one index. Returns whether it is expanded afterwards.
    pub fn toggle(&mut self, index: usize) -> bool {
        if let Some(pos) = self.indices.iter().position(|i| *i == index) {
            self.indices.remove(pos);
            false
        } else {
            self.indices.push(index);
            true
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}
