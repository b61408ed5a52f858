//! Document outlines and encrypted, portable exports for the assistant's
//! documents, model configurations and prompt templates.

pub mod config;
pub mod encryption;
pub mod outline;
pub mod reconcile;
pub mod records;
pub mod store;
pub mod transfer;

pub use config::FolioConfig;
pub use encryption::{CryptoBlob, EncryptionError};
pub use outline::{DocumentTree, HeadingNode};
pub use records::{Document, ModelConfig, PortableRecord, PromptItem};
pub use store::{RecordStore, SqliteStore};
