use super::record::{now_millis, NoteRecord, UpsertStatus};
use crate::core::error::Result;
use crate::search::index::{NoteIndex, SearchHit};
use crate::storage::notes::NoteStorage;
use tracing::{debug, warn};

/// Source of "now" in epoch milliseconds
pub trait Clock {
    fn now(&self) -> i64;
}

/// Wall clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        now_millis()
    }
}

/// Note workflows on top of a store and the in-memory index.
///
/// Every successful write reloads the snapshot so searches see the change.
pub struct NoteService<S: NoteStorage, C: Clock = SystemClock> {
    storage: S,
    clock: C,
    index: NoteIndex,
}

impl<S: NoteStorage> NoteService<S> {
    pub fn open(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: NoteStorage, C: Clock> NoteService<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        let mut service = Self {
            storage,
            clock,
            index: NoteIndex::unavailable(),
        };
        service.refresh();
        service
    }

    pub fn index(&self) -> &NoteIndex {
        &self.index
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reload the snapshot from storage. Returns false when the store could
    /// not be read; the index is then unavailable until the next good load.
    pub fn refresh(&mut self) -> bool {
        match self.storage.load_all() {
            Ok(notes) => {
                self.index.replace_all(notes);
                true
            }
            Err(e) => {
                warn!("Note snapshot unavailable: {}", e);
                self.index.mark_unavailable();
                false
            }
        }
    }

    pub fn search(&self, term: &str) -> Result<Vec<SearchHit<'_>>> {
        self.index.search(term)
    }

    pub fn note(&self, id: i64) -> Option<&NoteRecord> {
        self.index.get(id)
    }

    /// Store a new note. Blank content is rejected with `NoContent`.
    pub fn create_note(&mut self, title: &str, content: &str) -> UpsertStatus {
        let content = content.trim();
        if content.is_empty() {
            debug!("Refusing to create a note without content");
            return UpsertStatus::NoContent;
        }

        let now = self.clock.now();
        let status = self.storage.insert(title.trim(), content, now, now);
        self.after_write(status)
    }

    /// Replace a note's title and content. Blank content is rejected with
    /// `NoContent` so the caller can offer to delete the note instead.
    pub fn edit_note(&mut self, id: i64, title: &str, content: &str) -> UpsertStatus {
        let content = content.trim();
        if content.is_empty() {
            debug!("Refusing to save note {} without content", id);
            return UpsertStatus::NoContent;
        }

        let now = self.clock.now();
        let status = self.storage.update(id, title.trim(), content, now);
        self.after_write(status)
    }

    pub fn delete_note(&mut self, id: i64) -> UpsertStatus {
        let status = self.storage.delete(id);
        self.after_write(status)
    }

    fn after_write(&mut self, status: UpsertStatus) -> UpsertStatus {
        if status == UpsertStatus::Success {
            self.refresh();
        }
        status
    }
}
