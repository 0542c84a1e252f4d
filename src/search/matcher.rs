//! Case-insensitive substring matching over note text.
//!
//! Offsets are character offsets into the original string, so they stay
//! valid for rendering regardless of how many bytes a character takes.

use std::ops::Range;

/// A highlighted region `[start, end)` in character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Lower-case a single character, keeping the original when lower-casing
/// would change the character count (keeps offsets aligned).
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn folded(text: &str) -> Vec<char> {
    text.chars().map(fold).collect()
}

/// Find every case-insensitive occurrence of `needle` in `haystack`,
/// including overlapping ones ("aa" in "aaa" matches at 0 and 1).
///
/// An empty needle never matches.
pub fn find_all_matches(haystack: &str, needle: &str) -> Vec<Span> {
    if needle.is_empty() {
        return Vec::new();
    }

    let hay = folded(haystack);
    let pat = folded(needle);
    if pat.len() > hay.len() {
        return Vec::new();
    }

    hay.windows(pat.len())
        .enumerate()
        .filter(|(_, window)| *window == pat.as_slice())
        .map(|(start, _)| Span::new(start, start + pat.len()))
        .collect()
}

/// True if `needle` occurs in `haystack`; an empty needle counts as a match
/// because there is nothing to filter on.
pub fn contains_match(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let hay = folded(haystack);
    let pat = folded(needle);
    pat.len() <= hay.len() && hay.windows(pat.len()).any(|window| window == pat.as_slice())
}

/// Convert a character span into a byte range of `text`, clamped to its length.
pub fn span_to_byte_range(text: &str, span: Span) -> Range<usize> {
    let byte_at = |char_idx: usize| {
        text.char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    let start = byte_at(span.start);
    let end = byte_at(span.end).max(start);
    start..end
}

/// Merge overlapping or touching spans so they can be drawn as disjoint runs.
pub fn merge_spans(spans: &[Span]) -> Vec<Span> {
    let mut sorted: Vec<Span> = spans.iter().copied().filter(|s| !s.is_empty()).collect();
    sorted.sort_by_key(|s| (s.start, s.end));

    let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Split `text` into `(segment, highlighted)` runs according to `spans`.
pub fn segments<'a>(text: &'a str, spans: &[Span]) -> Vec<(&'a str, bool)> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for span in merge_spans(spans) {
        let range = span_to_byte_range(text, span);
        if range.start > cursor {
            out.push((&text[cursor..range.start], false));
        }
        if range.end > range.start {
            out.push((&text[range.clone()], true));
        }
        cursor = cursor.max(range.end);
    }
    if cursor < text.len() {
        out.push((&text[cursor..], false));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_needle_finds_nothing() {
        assert!(find_all_matches("hello", "").is_empty());
        assert!(find_all_matches("", "").is_empty());
    }

    #[test]
    fn missing_needle_finds_nothing() {
        assert!(find_all_matches("hello world", "xyz").is_empty());
        assert!(find_all_matches("ab", "abc").is_empty());
    }

    #[test]
    fn overlapping_matches_are_reported() {
        assert_eq!(
            find_all_matches("aaa", "aa"),
            vec![Span::new(0, 2), Span::new(1, 3)]
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(find_all_matches("Hello World", "WORLD"), vec![Span::new(6, 11)]);
        assert_eq!(find_all_matches("ÄpFEL äpfel", "äpfel").len(), 2);
    }

    #[test]
    fn offsets_are_in_characters() {
        let spans = find_all_matches("héllo wörld", "wö");
        assert_eq!(spans, vec![Span::new(6, 8)]);
        assert_eq!(span_to_byte_range("héllo wörld", spans[0]), 7..10);
    }

    #[test]
    fn contains_match_follows_find_all_matches() {
        assert!(contains_match("anything", ""));
        assert!(contains_match("Budget", "bud"));
        assert!(!contains_match("Budget", "groc"));
        assert!(!contains_match("", "a"));
    }

    #[test]
    fn metacharacters_are_plain_text() {
        assert_eq!(find_all_matches("a(b)c", "(b)"), vec![Span::new(1, 4)]);
        assert_eq!(find_all_matches("1+1=2", "+"), vec![Span::new(1, 2)]);
    }

    #[test]
    fn merge_joins_overlaps() {
        let merged = merge_spans(&[Span::new(1, 3), Span::new(0, 2), Span::new(5, 6)]);
        assert_eq!(merged, vec![Span::new(0, 3), Span::new(5, 6)]);
    }

    #[test]
    fn segments_cover_whole_text() {
        let text = "aaa bab";
        let segs = segments(text, &find_all_matches(text, "a"));
        let joined: String = segs.iter().map(|(s, _)| *s).collect();
        assert_eq!(joined, text);
        assert_eq!(segs[0], ("aaa", true));
        assert_eq!(segs[1], (" b", false));
        assert_eq!(segs[2], ("a", true));
        assert_eq!(segs[3], ("b", false));
    }
}
