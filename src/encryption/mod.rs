//! Password-based envelope for portable exports
//!
//! This module provides:
//! - ChaCha20-Poly1305 authenticated encryption
//! - Argon2id password-based key derivation with a fresh salt per blob
//! - A text armor for writing blobs to plain files

pub mod crypto;
pub mod errors;
pub mod models;

// Re-export commonly used types
pub use crypto::{
    decrypt, derive_key, encrypt, encrypt_with_params, generate_nonce, generate_salt,
    is_encrypted_file,
};
pub use errors::{EncryptionError, EncryptionResult};
pub use models::{Argon2Params, CryptoBlob, EncryptionKey, ENCRYPTED_MAGIC, ENVELOPE_VERSION};
