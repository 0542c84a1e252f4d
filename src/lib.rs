// Core functionality
pub mod core {
    pub mod config;
    pub mod error;
    pub mod logging;
}

// Note records and workflows
pub mod notes {
    pub mod form;
    pub mod record;
    pub mod service;
}

// Data storage
pub mod storage {
    pub mod notes;
}

// Matching, classification and highlighting
pub mod search {
    pub mod index;
    pub mod matcher;
    pub mod render;
    pub mod title;
}

// User interfaces
pub mod ui {
    pub mod cli;
    pub mod tui;
}

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
pub use crate::notes::form::{FormMode, FormOutcome, UpsertForm};
pub use crate::notes::record::{NoteRecord, UpsertStatus};
pub use crate::notes::service::{Clock, NoteService, SystemClock};
pub use crate::search::index::{MatchType, NoteIndex, SearchHit};
pub use crate::search::matcher::{contains_match, find_all_matches, Span};
pub use crate::search::render::NoteView;
pub use crate::storage::notes::{NoteStorage, NoteStore};
pub use crate::ui::cli::Cli;
pub use crate::ui::tui::NotesTui;
