use super::matcher::contains_match;
use crate::core::error::{Error, Result};
use crate::notes::record::NoteRecord;
use std::cmp::Reverse;
use tracing::debug;

/// Where a query term was found in a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    None,
    Content,
    Title,
    Both,
}

impl MatchType {
    pub fn highlights_title(self) -> bool {
        matches!(self, MatchType::Title | MatchType::Both)
    }

    pub fn highlights_content(self) -> bool {
        matches!(self, MatchType::Content | MatchType::Both)
    }
}

/// One note in a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub note: &'a NoteRecord,
    pub match_type: MatchType,
}

/// In-memory snapshot of all notes, kept newest-modified first
#[derive(Debug, Default)]
pub struct NoteIndex {
    notes: Option<Vec<NoteRecord>>,
}

impl NoteIndex {
    /// An index holding `notes`
    pub fn new(notes: Vec<NoteRecord>) -> Self {
        let mut index = Self::default();
        index.replace_all(notes);
        index
    }

    /// An index whose snapshot could not be loaded
    pub fn unavailable() -> Self {
        Self { notes: None }
    }

    pub fn is_available(&self) -> bool {
        self.notes.is_some()
    }

    /// Number of held notes, or `None` when unavailable
    pub fn len(&self) -> Option<usize> {
        self.notes.as_ref().map(Vec::len)
    }

    /// Swap in a fresh snapshot, sorted by last modification (newest first,
    /// higher id first on ties).
    pub fn replace_all(&mut self, mut notes: Vec<NoteRecord>) {
        notes.sort_by_key(|n| (Reverse(n.last_modified_at()), Reverse(n.id())));
        debug!("Note snapshot replaced ({} notes)", notes.len());
        self.notes = Some(notes);
    }

    /// Drop the snapshot after a failed load
    pub fn mark_unavailable(&mut self) {
        debug!("Note snapshot marked unavailable");
        self.notes = None;
    }

    /// Look up a held note by id
    pub fn get(&self, id: i64) -> Option<&NoteRecord> {
        self.notes.as_ref()?.iter().find(|n| n.id() == id)
    }

    /// Classify where `term` occurs in `note`
    pub fn classify(note: &NoteRecord, term: &str) -> MatchType {
        let term = term.trim();
        if term.is_empty() {
            return MatchType::None;
        }

        match (contains_match(note.title(), term), contains_match(note.content(), term)) {
            (true, true) => MatchType::Both,
            (false, true) => MatchType::Content,
            (true, false) => MatchType::Title,
            (false, false) => MatchType::None,
        }
    }

    /// Notes matching `term` in display order.
    ///
    /// A blank term returns every note tagged [`MatchType::None`]. Fails with
    /// [`Error::StorageUnavailable`] when no snapshot is loaded, which is
    /// distinct from an empty result.
    pub fn search(&self, term: &str) -> Result<Vec<SearchHit<'_>>> {
        let notes = self.notes.as_ref().ok_or(Error::StorageUnavailable)?;
        let term = term.trim();

        let hits: Vec<SearchHit<'_>> = if term.is_empty() {
            notes
                .iter()
                .map(|note| SearchHit { note, match_type: MatchType::None })
                .collect()
        } else {
            notes
                .iter()
                .filter_map(|note| match Self::classify(note, term) {
                    MatchType::None => None,
                    match_type => Some(SearchHit { note, match_type }),
                })
                .collect()
        };

        debug!("Search {:?} matched {} of {} notes", term, hits.len(), notes.len());
        Ok(hits)
    }
}
