//! Encryption data models

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Magic marker identifying an armored export envelope
pub const ENCRYPTED_MAGIC: &str = "FOLIO_ENC";

/// Current envelope layout version
pub const ENVELOPE_VERSION: u32 = 1;

/// Upper bound accepted for a stored memory cost (1 GiB, in KiB).
/// A blob asking for more is treated as corrupted.
pub const MAX_MEMORY_COST: u32 = 1024 * 1024;

/// Upper bound accepted for a stored time cost
pub const MAX_TIME_COST: u32 = 64;

/// Upper bound accepted for a stored parallelism factor
pub const MAX_PARALLELISM: u32 = 64;

/// Argon2id parameters for key derivation
///
/// These travel with every blob so that raising the defaults later
/// does not orphan older exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argon2Params {
    /// Memory cost in KiB (65536 = 64MB)
    pub memory_cost: u32,
    /// Number of iterations
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Whether the parameters are inside the range this build will honor
    pub fn is_within_limits(&self) -> bool {
        (1..=MAX_MEMORY_COST).contains(&self.memory_cost)
            && (1..=MAX_TIME_COST).contains(&self.time_cost)
            && (1..=MAX_PARALLELISM).contains(&self.parallelism)
    }
}

/// Opaque encrypted artifact: everything needed to re-derive the key
/// (salt + parameters) plus the sealed payload.
///
/// `ciphertext` carries the Poly1305 tag in its last 16 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct CryptoBlob {
    pub version: u32,
    pub kdf: Argon2Params,
    pub salt: Vec<u8>,
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl std::fmt::Debug for CryptoBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoBlob")
            .field("version", &self.version)
            .field("kdf", &self.kdf)
            .field("salt_len", &self.salt.len())
            .field("nonce_len", &self.nonce.len())
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

/// Text form of a [`CryptoBlob`] as written to an export file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArmoredBlob {
    pub magic: String,
    pub version: u32,
    pub kdf: Argon2Params,
    /// base64
    pub salt: String,
    /// base64
    pub nonce: String,
    /// base64, tag appended
    pub ciphertext: String,
}

/// Encryption key with secure memory handling
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    /// The 256-bit key
    key: [u8; 32],
}

impl EncryptionKey {
    /// Create a new encryption key from raw bytes
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
