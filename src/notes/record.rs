use crate::core::config::DEFAULT_TITLE_LIMIT;
use crate::core::error::{Error, Result};
use crate::search::title::{default_title, truncate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id carried by notes that have not been stored yet
pub const UNSAVED_ID: i64 = -1;

/// Display format for note timestamps, e.g. "05 Mar 2024 14:07"
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M";

/// Date-only part of [`TIMESTAMP_FORMAT`]
pub const DATE_FORMAT: &str = "%d %b %Y";

/// Outcome of a create, update or delete against the note store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStatus {
    Success,
    Failed,
    NoContent,
}

impl UpsertStatus {
    /// Map a status onto the error taxonomy; `action` names the failed write
    pub fn into_result(self, action: &str) -> Result<()> {
        match self {
            UpsertStatus::Success => Ok(()),
            UpsertStatus::Failed => Err(Error::UpsertFailed(action.to_string())),
            UpsertStatus::NoContent => Err(Error::EmptyContent),
        }
    }
}

/// A single note.
///
/// Records are never mutated in place; editing produces a new record.
/// Timestamps are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    id: i64,
    title: String,
    content: String,
    created_at: i64,
    last_modified_at: i64,
}

impl NoteRecord {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: i64,
        last_modified_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            created_at,
            last_modified_at,
        }
    }

    /// A record that has not been stored yet
    pub fn unsaved(title: impl Into<String>, content: impl Into<String>, now: i64) -> Self {
        Self::new(UNSAVED_ID, title, content, now, now)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id >= 0
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn last_modified_at(&self) -> i64 {
        self.last_modified_at
    }

    /// A copy with new title, content and modification time
    pub fn edited(&self, title: impl Into<String>, content: impl Into<String>, now: i64) -> Self {
        Self {
            id: self.id,
            title: title.into(),
            content: content.into(),
            created_at: self.created_at,
            last_modified_at: now.max(self.created_at),
        }
    }

    /// A copy carrying the id assigned by storage
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    pub fn display_created_at(&self) -> String {
        format_timestamp(self.created_at, TIMESTAMP_FORMAT)
    }

    pub fn display_modified_at(&self) -> String {
        format_timestamp(self.last_modified_at, TIMESTAMP_FORMAT)
    }

    /// Title cut to the default display limit
    pub fn short_title(&self) -> String {
        truncate(&self.title, DEFAULT_TITLE_LIMIT)
    }

    /// The title to show without highlighting: the short title, or
    /// `"Note <created date>"` for untitled notes.
    pub fn display_title(&self, limit: usize) -> String {
        if self.title.is_empty() {
            default_title(&format_timestamp(self.created_at, DATE_FORMAT))
        } else {
            truncate(&self.title, limit)
        }
    }
}

/// Format epoch milliseconds in UTC
pub fn format_timestamp(millis: i64, format: &str) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format(format).to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
