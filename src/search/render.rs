use super::index::{MatchType, SearchHit};
use super::matcher::{find_all_matches, Span};
use super::title::{escape_html, highlight_title};

/// Everything a front end needs to draw one search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub id: i64,
    /// Plain title (truncated, or the default title for untitled notes)
    pub title: String,
    /// Title markup; highlighted only when the title matched
    pub title_markup: String,
    /// Ranges of the title to emphasise, in characters of `title`
    pub title_spans: Vec<Span>,
    pub content: String,
    /// Ranges of the content to emphasise, in characters
    pub content_spans: Vec<Span>,
    pub modified: String,
    pub match_type: MatchType,
}

impl NoteView {
    pub fn new(hit: &SearchHit<'_>, term: &str, title_limit: usize) -> Self {
        let note = hit.note;
        let term = term.trim();
        let title = note.display_title(title_limit);

        let (title_markup, title_spans) = match hit.match_type {
            MatchType::Title | MatchType::Both if !note.title().is_empty() => (
                highlight_title(note.title(), term, title_limit),
                find_all_matches(&title, term),
            ),
            MatchType::None | MatchType::Content | MatchType::Title | MatchType::Both => {
                (format!("<html>{}</html>", escape_html(&title)), Vec::new())
            }
        };

        let content_spans = match hit.match_type {
            MatchType::Content | MatchType::Both => find_all_matches(note.content(), term),
            MatchType::None | MatchType::Title => Vec::new(),
        };

        Self {
            id: note.id(),
            title,
            title_markup,
            title_spans,
            content: note.content().to_string(),
            content_spans,
            modified: note.display_modified_at(),
            match_type: hit.match_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::record::NoteRecord;
    use crate::search::index::NoteIndex;

    #[test]
    fn test_title_match_only_highlights_title() {
        let index = NoteIndex::new(vec![NoteRecord::new(1, "Budget", "groceries", 0, 0)]);
        let hits = index.search("bud").unwrap();
        let view = NoteView::new(&hits[0], "bud", 30);

        assert_eq!(view.match_type, MatchType::Title);
        assert_eq!(view.title_markup, "<html><span bgcolor='#F7A9A9'>Bud</span>get</html>");
        assert_eq!(view.title_spans, vec![Span::new(0, 3)]);
        assert!(view.content_spans.is_empty());
    }

    #[test]
    fn test_content_match_only_highlights_content() {
        let index = NoteIndex::new(vec![NoteRecord::new(1, "Budget", "groceries, more groceries", 0, 0)]);
        let hits = index.search("groc").unwrap();
        let view = NoteView::new(&hits[0], "groc", 30);

        assert_eq!(view.title_markup, "<html>Budget</html>");
        assert_eq!(view.content_spans, vec![Span::new(0, 4), Span::new(16, 20)]);
    }

    #[test]
    fn test_untitled_note_uses_default_title() {
        let index = NoteIndex::new(vec![NoteRecord::new(1, "", "note text", 0, 0)]);
        let hits = index.search("").unwrap();
        let view = NoteView::new(&hits[0], "", 30);

        assert_eq!(view.title, "Note 01 Jan 1970");
        assert_eq!(view.modified, "01 Jan 1970 00:00");
    }
}
