//! Cryptographic operations for encryption/decryption

use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use zeroize::Zeroize;

use super::errors::{EncryptionError, EncryptionResult};
use super::models::{
    Argon2Params, ArmoredBlob, CryptoBlob, EncryptionKey, ENCRYPTED_MAGIC, ENVELOPE_VERSION,
};

/// Salt size in bytes
const SALT_SIZE: usize = 16;

/// Nonce size in bytes for ChaCha20-Poly1305
const NONCE_SIZE: usize = 12;

/// Poly1305 tag size in bytes
const TAG_SIZE: usize = 16;

/// Shortest salt Argon2 accepts
const MIN_SALT_SIZE: usize = 8;

/// Generate a random salt for key derivation
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Generate a random nonce for encryption
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Derive an encryption key from a password using Argon2id
pub fn derive_key(password: &str, salt: &[u8], params: &Argon2Params) -> EncryptionResult<EncryptionKey> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32), // Output 256-bit key
    )
    .map_err(|e| EncryptionError::KeyDerivationFailed(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| EncryptionError::KeyDerivationFailed(e.to_string()))?;

    let derived = EncryptionKey::new(key);
    key.zeroize();
    Ok(derived)
}

/// Encrypt `plaintext` under a key derived from `password` with the default parameters
pub fn encrypt(plaintext: &[u8], password: &str) -> EncryptionResult<CryptoBlob> {
    encrypt_with_params(plaintext, password, &Argon2Params::default())
}

/// Encrypt `plaintext` under a key derived from `password` with explicit parameters
///
/// A fresh salt and nonce are drawn for every call.
pub fn encrypt_with_params(
    plaintext: &[u8],
    password: &str,
    params: &Argon2Params,
) -> EncryptionResult<CryptoBlob> {
    if password.is_empty() {
        return Err(EncryptionError::PasswordRequired);
    }
    if !params.is_within_limits() {
        return Err(EncryptionError::KeyDerivationFailed(format!(
            "parameters out of range: {:?}",
            params
        )));
    }

    log::debug!(
        "Deriving export key (memory {} KiB, {} passes, {} lanes)",
        params.memory_cost,
        params.time_cost,
        params.parallelism
    );

    let salt = generate_salt();
    let key = derive_key(password, &salt, params)?;

    let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

    let nonce_bytes = generate_nonce();
    let nonce = Nonce::from_slice(&nonce_bytes);

    // ChaCha20-Poly1305 appends the auth tag to the ciphertext
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

    Ok(CryptoBlob {
        version: ENVELOPE_VERSION,
        kdf: *params,
        salt: salt.to_vec(),
        nonce: nonce_bytes.to_vec(),
        ciphertext,
    })
}

/// Decrypt a blob with `password`
///
/// All-or-nothing: either the full plaintext is returned or
/// [`EncryptionError::AuthenticationFailed`]. Only the public header
/// (envelope version) may produce a different error.
pub fn decrypt(blob: &CryptoBlob, password: &str) -> EncryptionResult<Vec<u8>> {
    if blob.version != ENVELOPE_VERSION {
        return Err(EncryptionError::UnsupportedVersion(blob.version));
    }

    if blob.nonce.len() != NONCE_SIZE
        || blob.ciphertext.len() < TAG_SIZE
        || blob.salt.len() < MIN_SALT_SIZE
        || !blob.kdf.is_within_limits()
    {
        return Err(EncryptionError::AuthenticationFailed);
    }

    let key = derive_key(password, &blob.salt, &blob.kdf)
        .map_err(|_| EncryptionError::AuthenticationFailed)?;

    let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| EncryptionError::AuthenticationFailed)?;

    let nonce = Nonce::from_slice(&blob.nonce);

    cipher
        .decrypt(nonce, blob.ciphertext.as_slice())
        .map_err(|_| EncryptionError::AuthenticationFailed)
}

impl CryptoBlob {
    /// Render the blob as the text stored in an export file
    pub fn to_armored(&self) -> String {
        let armored = ArmoredBlob {
            magic: ENCRYPTED_MAGIC.to_string(),
            version: self.version,
            kdf: self.kdf,
            salt: BASE64.encode(&self.salt),
            nonce: BASE64.encode(&self.nonce),
            ciphertext: BASE64.encode(&self.ciphertext),
        };
        // A struct of strings and integers always serializes
        serde_json::to_string_pretty(&armored).unwrap_or_default()
    }

    /// Parse the text form of a blob
    ///
    /// Text with no envelope marker is [`EncryptionError::InvalidFormat`].
    /// Once the marker is present, any damage is reported as
    /// [`EncryptionError::AuthenticationFailed`] so a truncated or edited
    /// file is indistinguishable from a wrong password.
    pub fn from_armored(content: &str) -> EncryptionResult<Self> {
        if !is_encrypted_file(content) {
            return Err(EncryptionError::InvalidFormat);
        }

        let armored: ArmoredBlob =
            serde_json::from_str(content).map_err(|_| EncryptionError::AuthenticationFailed)?;

        if armored.magic != ENCRYPTED_MAGIC {
            return Err(EncryptionError::InvalidFormat);
        }
        if armored.version != ENVELOPE_VERSION {
            return Err(EncryptionError::UnsupportedVersion(armored.version));
        }

        let decode = |field: &str| {
            BASE64
                .decode(field)
                .map_err(|_| EncryptionError::AuthenticationFailed)
        };

        Ok(Self {
            version: armored.version,
            kdf: armored.kdf,
            salt: decode(&armored.salt)?,
            nonce: decode(&armored.nonce)?,
            ciphertext: decode(&armored.ciphertext)?,
        })
    }
}

/// Check if file content appears to be an armored envelope
pub fn is_encrypted_file(content: &str) -> bool {
    // Quick check before parsing JSON
    content.trim_start().starts_with('{') && content.contains(ENCRYPTED_MAGIC)
}
