use std::path::PathBuf;

use chrono::Utc;
use rusqlite::{params, Connection};

use super::{RecordStore, StoreError, StoreResult};
use crate::records::{PortableRecord, RecordId};

/// [`RecordStore`] backed by a single SQLite table.
///
/// Each record is kept as its JSON body next to the section key and
/// display name; SQLite's rowid is the record identifier.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store at `db_path`
    pub fn open(db_path: PathBuf) -> StoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                section TEXT NOT NULL,
                name TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_section ON records(section);
            "#,
        )?;
        Ok(())
    }

    /// Fetch one record by id
    pub fn get_record<R: PortableRecord>(&self, id: RecordId) -> StoreResult<R> {
        let body: String = self
            .conn
            .query_row(
                "SELECT body FROM records WHERE section = ?1 AND id = ?2",
                params![R::SECTION, id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
                    section: R::SECTION,
                    id,
                },
                other => StoreError::Sqlite(other),
            })?;

        let mut record: R = serde_json::from_str(&body)?;
        record.set_id(Some(id));
        Ok(record)
    }

    /// Find a record by display name (case-insensitive)
    pub fn find_by_name<R: PortableRecord>(&self, name: &str) -> StoreResult<Option<R>> {
        let found = self
            .list_records::<R>()?
            .into_iter()
            .find(|r| r.name().to_lowercase() == name.to_lowercase());
        Ok(found)
    }
}

impl RecordStore for SqliteStore {
    fn add_record<R: PortableRecord>(&self, record: &R) -> StoreResult<RecordId> {
        let mut stored = record.clone();
        stored.set_id(None);
        let body = serde_json::to_string(&stored)?;

        self.conn.execute(
            "INSERT INTO records (section, name, body, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![R::SECTION, stored.name(), body, Utc::now().to_rfc3339()],
        )?;

        let id = self.conn.last_insert_rowid();
        log::debug!("Stored {} record {} ({})", R::SECTION, id, stored.name());
        Ok(id)
    }

    fn list_records<R: PortableRecord>(&self) -> StoreResult<Vec<R>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM records WHERE section = ?1 ORDER BY id")?;

        let rows = stmt
            .query_map(params![R::SECTION], |row| {
                Ok((row.get::<_, RecordId>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (id, body) in rows {
            let mut record: R = serde_json::from_str(&body)?;
            record.set_id(Some(id));
            records.push(record);
        }
        Ok(records)
    }

    fn delete_record<R: PortableRecord>(&self, id: RecordId) -> StoreResult<()> {
        let affected = self.conn.execute(
            "DELETE FROM records WHERE section = ?1 AND id = ?2",
            params![R::SECTION, id],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound {
                section: R::SECTION,
                id,
            });
        }
        Ok(())
    }

    fn count_records<R: PortableRecord>(&self) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE section = ?1",
            params![R::SECTION],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::HeadingNode;
    use crate::records::{Document, ModelConfig, PromptItem};
    use tempfile::TempDir;

    fn model(name: &str) -> ModelConfig {
        ModelConfig {
            name: name.to_string(),
            provider: "ollama".to_string(),
            model: "llama3".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_assigns_fresh_ids() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut incoming = model("Local");
        incoming.id = Some(500);

        let first = store.add_record(&incoming).unwrap();
        let second = store.add_record(&incoming).unwrap();
        assert_ne!(first, 500);
        assert_ne!(first, second);

        let listed: Vec<ModelConfig> = store.list_records().unwrap();
        let ids: Vec<Option<RecordId>> = listed.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![Some(first), Some(second)]);
    }

    #[test]
    fn test_sections_are_isolated() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.add_record(&model("A")).unwrap();
        store
            .add_record(&PromptItem {
                title: "Summarize".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(store.count_records::<ModelConfig>().unwrap(), 1);
        assert_eq!(store.count_records::<PromptItem>().unwrap(), 1);
        assert_eq!(store.count_records::<Document>().unwrap(), 0);
    }

    #[test]
    fn test_delete_and_missing() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.add_record(&model("Gone")).unwrap();

        store.delete_record::<ModelConfig>(id).unwrap();
        assert_eq!(store.count_records::<ModelConfig>().unwrap(), 0);
        assert!(matches!(
            store.delete_record::<ModelConfig>(id),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.get_record::<ModelConfig>(id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_document_headings_persist_as_flat_list() {
        let store = SqliteStore::open_in_memory().unwrap();
        let doc = Document {
            name: "Guide".to_string(),
            headings: vec![
                HeadingNode::new(1, 1, "Intro", 1).with_content("Hello"),
                HeadingNode::new(2, 2, "Details", 2).with_parent(1),
            ],
            ..Default::default()
        };

        let id = store.add_record(&doc).unwrap();
        let loaded: Document = store.get_record(id).unwrap();
        assert_eq!(loaded.headings, doc.headings);
        assert_eq!(loaded.id, Some(id));

        let found: Option<Document> = store.find_by_name("guide").unwrap();
        assert_eq!(found.map(|d| d.id), Some(Some(id)));
    }

    #[test]
    fn test_open_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("folio.db");

        {
            let store = SqliteStore::open(path.clone()).unwrap();
            store.add_record(&model("Persisted")).unwrap();
        }

        let reopened = SqliteStore::open(path).unwrap();
        assert_eq!(reopened.count_records::<ModelConfig>().unwrap(), 1);
    }
}
