//! Application configuration loaded from `config.toml` in the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encryption::Argon2Params;
use crate::outline::search::{SearchOptions, DEFAULT_SNIPPET_CHARS};

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "FOLIO_DATA_DIR";

const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DB_FILE: &str = "folio.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    /// KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for KdfConfig {
    fn default() -> Self {
        let params = Argon2Params::default();
        Self {
            memory_cost: params.memory_cost,
            time_cost: params.time_cost,
            parallelism: params.parallelism,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    pub snippet_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Defaults to `folio.db` inside the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    pub kdf: KdfConfig,
    pub search: SearchConfig,
}

impl FolioConfig {
    /// Get the data directory: `$FOLIO_DATA_DIR`, else the platform's
    /// local data dir
    pub fn default_data_dir() -> ConfigResult<PathBuf> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        dirs::data_local_dir()
            .map(|p| p.join("folio"))
            .ok_or(ConfigError::DataDirNotFound)
    }

    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load the config, falling back to defaults when no file exists
    pub fn load(data_dir: &Path) -> ConfigResult<Self> {
        let path = Self::config_path(data_dir);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: FolioConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> ConfigResult<()> {
        fs::create_dir_all(data_dir)?;
        let content = toml::to_string_pretty(self)?;
        fs::write(Self::config_path(data_dir), content)?;
        Ok(())
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir.join(DEFAULT_DB_FILE))
    }

    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_cost: self.kdf.memory_cost,
            time_cost: self.kdf.time_cost,
            parallelism: self.kdf.parallelism,
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            case_sensitive: self.search.case_sensitive,
            snippet_chars: self.search.snippet_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = FolioConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, FolioConfig::default());
        assert_eq!(config.argon2_params(), Argon2Params::default());
        assert_eq!(
            config.database_path(temp_dir.path()),
            temp_dir.path().join("folio.db")
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            FolioConfig::config_path(temp_dir.path()),
            "[kdf]\ntime_cost = 5\n\n[search]\ncase_sensitive = true\nfuture_key = 1\n",
        )
        .unwrap();

        let config = FolioConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config.kdf.time_cost, 5);
        assert_eq!(config.kdf.memory_cost, Argon2Params::default().memory_cost);
        assert!(config.search_options().case_sensitive);
        assert_eq!(config.search.snippet_chars, DEFAULT_SNIPPET_CHARS);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = FolioConfig::default();
        config.database_path = Some(temp_dir.path().join("other.db"));
        config.kdf.parallelism = 2;
        config.save(temp_dir.path()).unwrap();

        let loaded = FolioConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(FolioConfig::config_path(temp_dir.path()), "kdf = [").unwrap();
        assert!(matches!(
            FolioConfig::load(temp_dir.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
