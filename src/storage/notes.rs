use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::notes::record::{NoteRecord, UpsertStatus};
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Table definition for notes
/// Key: note id
/// Value: JSON serialized NoteRow
const NOTES_TABLE: TableDefinition<i64, &str> = TableDefinition::new("note");

/// Bookkeeping values such as the next id to hand out
const META_TABLE: TableDefinition<&str, u64> = TableDefinition::new("meta");

const NEXT_ID_KEY: &str = "next_id";

/// Ids start at 1 and are never reused
const FIRST_ID: u64 = 1;

/// Persisted form of a note; field names are the stored column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub create_date: i64,
    pub last_mod_date: i64,
}

impl NoteRow {
    /// Serialize to JSON string
    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::Database(format!("Failed to serialize note: {}", e)))
    }

    /// Deserialize from JSON string
    fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Database(format!("Failed to deserialize note: {}", e)))
    }
}

impl From<NoteRow> for NoteRecord {
    fn from(row: NoteRow) -> Self {
        NoteRecord::new(row.id, row.title, row.content, row.create_date, row.last_mod_date)
    }
}

impl From<&NoteRecord> for NoteRow {
    fn from(note: &NoteRecord) -> Self {
        Self {
            id: note.id(),
            title: note.title().to_string(),
            content: note.content().to_string(),
            create_date: note.created_at(),
            last_mod_date: note.last_modified_at(),
        }
    }
}

/// The persistence boundary for notes.
///
/// Writes report an [`UpsertStatus`] and never retry; callers decide what to do
/// with a failure.
pub trait NoteStorage {
    /// Every stored note, or an error when the store cannot be read
    fn load_all(&self) -> Result<Vec<NoteRecord>>;

    fn insert(&self, title: &str, content: &str, created_at: i64, last_modified_at: i64) -> UpsertStatus;

    fn update(&self, id: i64, title: &str, content: &str, last_modified_at: i64) -> UpsertStatus;

    fn delete(&self, id: i64) -> UpsertStatus;
}

/// redb-backed note store
pub struct NoteStore {
    db: Database,
}

impl NoteStore {
    /// Open or create the note store
    pub fn open(config: &Config) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = if config.database_path.exists() {
            Database::open(&config.database_path).map_err(|e| {
                let msg = e.to_string();
                if msg.to_lowercase().contains("lock") {
                    Error::Database("Note database is locked. Another jotter process may be running. Close other instances and try again.".to_string())
                } else {
                    Error::Database(format!("Failed to open note database: {}", e))
                }
            })?
        } else {
            Database::create(&config.database_path)
                .map_err(|e| Error::Database(format!("Failed to create note database: {}", e)))?
        };

        // Initialize tables (safe even if they already exist)
        let write_txn = db.begin_write().map_err(|e| {
            Error::Database(format!("Failed to begin write transaction: {}", e))
        })?;
        {
            let _notes = write_txn.open_table(NOTES_TABLE).map_err(|e| {
                Error::Database(format!("Failed to open table: {}", e))
            })?;
            let _meta = write_txn.open_table(META_TABLE).map_err(|e| {
                Error::Database(format!("Failed to open table: {}", e))
            })?;
        }
        write_txn.commit().map_err(|e| {
            Error::Database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(Self { db })
    }

    fn read_all(&self) -> Result<Vec<NoteRecord>> {
        let read_txn = self.db.begin_read().map_err(|e| {
            Error::Database(format!("Failed to begin read transaction: {}", e))
        })?;

        let table = read_txn.open_table(NOTES_TABLE).map_err(|e| {
            Error::Database(format!("Failed to open table: {}", e))
        })?;

        let mut notes: Vec<NoteRecord> = Vec::new();
        for item in table.iter().map_err(|e| {
            Error::Database(format!("Failed to iterate table: {}", e))
        })? {
            let (_key, value) = item.map_err(|e| {
                Error::Database(format!("Failed to read table item: {}", e))
            })?;
            notes.push(NoteRow::from_json(value.value())?.into());
        }

        Ok(notes)
    }

    /// Get a single note by id
    pub fn get(&self, id: i64) -> Result<Option<NoteRecord>> {
        let read_txn = self.db.begin_read().map_err(|e| {
            Error::Database(format!("Failed to begin read transaction: {}", e))
        })?;

        let table = read_txn.open_table(NOTES_TABLE).map_err(|e| {
            Error::Database(format!("Failed to open table: {}", e))
        })?;

        let json_str = match table.get(id).map_err(|e| {
            Error::Database(format!("Failed to get note: {}", e))
        })? {
            Some(guard) => guard.value().to_string(),
            None => return Ok(None),
        };

        NoteRow::from_json(&json_str).map(|row| Some(row.into()))
    }

    fn try_insert(&self, title: &str, content: &str, created_at: i64, last_modified_at: i64) -> Result<i64> {
        let write_txn = self.db.begin_write().map_err(|e| {
            Error::Database(format!("Failed to begin write transaction: {}", e))
        })?;

        let id = {
            let mut meta = write_txn.open_table(META_TABLE).map_err(|e| {
                Error::Database(format!("Failed to open table: {}", e))
            })?;
            let next = meta
                .get(NEXT_ID_KEY)
                .map_err(|e| Error::Database(format!("Failed to read next id: {}", e)))?
                .map(|guard| guard.value())
                .unwrap_or(FIRST_ID);
            meta.insert(NEXT_ID_KEY, next + 1).map_err(|e| {
                Error::Database(format!("Failed to store next id: {}", e))
            })?;

            let id = i64::try_from(next)
                .map_err(|_| Error::Database("Note id space exhausted".to_string()))?;
            let row = NoteRow {
                id,
                title: title.to_string(),
                content: content.to_string(),
                create_date: created_at,
                last_mod_date: last_modified_at.max(created_at),
            };
            let json_str = row.to_json()?;

            let mut notes = write_txn.open_table(NOTES_TABLE).map_err(|e| {
                Error::Database(format!("Failed to open table: {}", e))
            })?;
            notes.insert(id, json_str.as_str()).map_err(|e| {
                Error::Database(format!("Failed to insert note: {}", e))
            })?;
            id
        };

        write_txn.commit().map_err(|e| {
            Error::Database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(id)
    }

    fn try_update(&self, id: i64, title: &str, content: &str, last_modified_at: i64) -> Result<()> {
        let write_txn = self.db.begin_write().map_err(|e| {
            Error::Database(format!("Failed to begin write transaction: {}", e))
        })?;

        {
            let mut table = write_txn.open_table(NOTES_TABLE).map_err(|e| {
                Error::Database(format!("Failed to open table: {}", e))
            })?;

            let existing = table
                .get(id)
                .map_err(|e| Error::Database(format!("Failed to get note: {}", e)))?
                .map(|guard| guard.value().to_string());
            let mut row = match existing {
                Some(json_str) => NoteRow::from_json(&json_str)?,
                None => return Err(Error::NoteNotFound(id)),
            };

            row.title = title.to_string();
            row.content = content.to_string();
            row.last_mod_date = last_modified_at.max(row.create_date);

            let json_str = row.to_json()?;
            table.insert(id, json_str.as_str()).map_err(|e| {
                Error::Database(format!("Failed to update note: {}", e))
            })?;
        }

        write_txn.commit().map_err(|e| {
            Error::Database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }

    fn try_delete(&self, id: i64) -> Result<bool> {
        let write_txn = self.db.begin_write().map_err(|e| {
            Error::Database(format!("Failed to begin write transaction: {}", e))
        })?;

        let removed = {
            let mut table = write_txn.open_table(NOTES_TABLE).map_err(|e| {
                Error::Database(format!("Failed to open table: {}", e))
            })?;

            let removed = table.remove(id).map_err(|e| {
                Error::Database(format!("Failed to remove note: {}", e))
            })?;
            removed.is_some()
        };

        write_txn.commit().map_err(|e| {
            Error::Database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(removed)
    }
}

impl NoteStorage for NoteStore {
    fn load_all(&self) -> Result<Vec<NoteRecord>> {
        self.read_all().map_err(|e| {
            warn!("Could not load notes: {}", e);
            Error::StorageUnavailable
        })
    }

    fn insert(&self, title: &str, content: &str, created_at: i64, last_modified_at: i64) -> UpsertStatus {
        match self.try_insert(title, content, created_at, last_modified_at) {
            Ok(id) => {
                info!("Created note {}", id);
                UpsertStatus::Success
            }
            Err(e) => {
                warn!("Could not save note: {}", e);
                UpsertStatus::Failed
            }
        }
    }

    fn update(&self, id: i64, title: &str, content: &str, last_modified_at: i64) -> UpsertStatus {
        match self.try_update(id, title, content, last_modified_at) {
            Ok(()) => {
                info!("Updated note {}", id);
                UpsertStatus::Success
            }
            Err(e) => {
                warn!("Could not edit note {}: {}", id, e);
                UpsertStatus::Failed
            }
        }
    }

    fn delete(&self, id: i64) -> UpsertStatus {
        match self.try_delete(id) {
            Ok(true) => {
                info!("Deleted note {}", id);
                UpsertStatus::Success
            }
            Ok(false) => UpsertStatus::Success,
            Err(e) => {
                warn!("Could not delete note {}: {}", id, e);
                UpsertStatus::Failed
            }
        }
    }
}
