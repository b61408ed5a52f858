use thiserror::Error;

use crate::encryption::EncryptionError;
use crate::store::StoreError;

/// Problems with a decrypted payload
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Unsupported export format version: {0}")]
    UnsupportedVersion(String),

    #[error("Malformed export payload: {0}")]
    Malformed(String),

    #[error("Malformed section '{section}': {message}")]
    MalformedSection { section: String, message: String },
}

pub type FormatResult<T> = Result<T, FormatError>;

/// Errors from the export/import round trip as a whole
#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing selected for export")]
    NothingToExport,
}

pub type TransferResult<T> = Result<T, TransferError>;
