use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    /// The note snapshot could not be loaded from storage.
    #[error("Notes are unavailable: the note store could not be read")]
    StorageUnavailable,

    #[error("Storage write failed: {0}")]
    UpsertFailed(String),

    #[error("Note content is empty")]
    EmptyContent,

    #[error("No note with id {0}")]
    NoteNotFound(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
