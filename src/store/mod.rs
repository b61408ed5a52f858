//! Local record persistence.
//!
//! The rest of the crate talks to storage only through [`RecordStore`].

mod sqlite;

use thiserror::Error;

use crate::records::{PortableRecord, RecordId};

pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found: {section}/{id}")]
    NotFound { section: &'static str, id: RecordId },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence service for portable records.
///
/// Identifiers are always assigned by the store; `add_record` ignores
/// whatever id the record carries.
pub trait RecordStore {
    fn add_record<R: PortableRecord>(&self, record: &R) -> StoreResult<RecordId>;
    fn list_records<R: PortableRecord>(&self) -> StoreResult<Vec<R>>;
    fn delete_record<R: PortableRecord>(&self, id: RecordId) -> StoreResult<()>;
    fn count_records<R: PortableRecord>(&self) -> StoreResult<usize>;
}
