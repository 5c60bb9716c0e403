//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key or tampered blob)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Blob is too short to carry a nonce
    #[error("Invalid ciphertext: {actual} bytes, need at least {minimum}")]
    InvalidCiphertext {
        /// Minimum blob length in bytes
        minimum: usize,
        /// Actual blob length in bytes
        actual: usize,
    },

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Operating system entropy source failed
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Decrypted asset does not match its recorded fingerprint
    #[error("Asset fingerprint mismatch: expected {expected}, got {actual}")]
    FingerprintMismatch {
        /// Fingerprint recorded with the asset
        expected: String,
        /// Fingerprint of the decrypted bytes
        actual: String,
    },
}

impl CryptoError {
    /// Entropy exhaustion is unrecoverable.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EntropyUnavailable(_))
    }
}
