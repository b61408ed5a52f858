use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use folio_lib::records::{Document, PortableRecord};
use folio_lib::store::{RecordStore, SqliteStore};
use folio_lib::FolioConfig;

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    pub config: FolioConfig,
    pub store: SqliteStore,
}

impl App {
    /// Initialize from the given data directory, or the default one
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FolioConfig::default_data_dir().context("Failed to get data directory")?,
        };

        let config = FolioConfig::load(&data_dir).context("Failed to load config.toml")?;
        let db_path = config.database_path(&data_dir);
        let store = SqliteStore::open(db_path.clone())
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

        log::debug!("Using data directory {}", data_dir.display());

        Ok(Self {
            data_dir,
            config,
            store,
        })
    }

    /// Find a document by name (case-insensitive prefix match)
    pub fn find_document(&self, name: &str) -> Result<Document> {
        let documents: Vec<Document> = self
            .store
            .list_records()
            .context("Failed to list documents")?;

        let name_lower = name.to_lowercase();

        // Exact match first
        if let Some(doc) = documents.iter().find(|d| d.name.to_lowercase() == name_lower) {
            return Ok(doc.clone());
        }

        // Prefix match
        let matches: Vec<&Document> = documents
            .iter()
            .filter(|d| d.name.to_lowercase().starts_with(&name_lower))
            .collect();

        match matches.len() {
            0 => bail!(
                "No document matching '{}'. Available documents:\n{}",
                name,
                documents
                    .iter()
                    .map(|d| format!("  - {}", d.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous document name '{}'. Matches:\n{}",
                name,
                matches
                    .iter()
                    .map(|d| format!("  - {}", d.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    pub fn list<R: PortableRecord>(&self) -> Result<Vec<R>> {
        self.store
            .list_records()
            .with_context(|| format!("Failed to list {}", R::SECTION))
    }

    pub fn count<R: PortableRecord>(&self) -> Result<usize> {
        self.store
            .count_records::<R>()
            .with_context(|| format!("Failed to count {}", R::SECTION))
    }
}
