//! Encryption error types

use thiserror::Error;

/// Errors that can occur during encryption operations
///
/// Decryption never reports *why* a blob could not be opened: a wrong
/// password, a flipped bit and a truncated ciphertext all surface as
/// [`EncryptionError::AuthenticationFailed`].
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid encrypted data format")]
    InvalidFormat,

    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(u32),
}

/// Result type alias for encryption operations
pub type EncryptionResult<T> = Result<T, EncryptionError>;
