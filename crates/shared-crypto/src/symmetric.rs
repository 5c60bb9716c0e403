//! # Symmetric Encryption
//!
//! Asset payloads are sealed with XChaCha20-Poly1305 under a per-asset key.
//!
//! ## Blob Layout
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────┐
//! │ nonce (24 bytes) │ ciphertext + tag (n + 16)    │
//! └──────────────────┴──────────────────────────────┘
//! ```
//!
//! A fresh nonce is drawn for every call to [`encrypt`], so the same key
//! never sees the same nonce twice in practice (192-bit random nonce).
//!
//! ## Key Rotation
//!
//! [`rotate`] is the custody-transfer primitive: decrypt under the old key,
//! draw a new key, re-encrypt. The old key is zeroized when dropped and no
//! history is kept.

use crate::CryptoError;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes (XChaCha20).
pub const NONCE_LEN: usize = 24;

/// Secret key (256-bit).
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking its length.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` unless the slice is 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEY_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Generate a random key from the OS entropy source.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EntropyUnavailable` if the OS RNG fails.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; KEY_LEN];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Copy the key out for persistence alongside its asset.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Nonce for encryption.
#[derive(Clone)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate a random nonce.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EntropyUnavailable` if the OS RNG fails.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; NONCE_LEN];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

fn fill_random(buf: &mut [u8]) -> Result<(), CryptoError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))
}

fn cipher_for(key: &SecretKey) -> XChaCha20Poly1305 {
    XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()))
}

/// Encrypt plaintext with XChaCha20-Poly1305.
///
/// Returns `nonce || ciphertext`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails, or
/// `CryptoError::EntropyUnavailable` if no nonce can be drawn.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let nonce = Nonce::generate()?;

    let ciphertext = cipher_for(key)
        .encrypt(XNonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(nonce.as_bytes());
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a `nonce || ciphertext` blob.
///
/// # Errors
///
/// Returns `CryptoError::InvalidCiphertext` if the blob is shorter than a
/// nonce, `CryptoError::DecryptionFailed` on a wrong key or tampering.
pub fn decrypt(key: &SecretKey, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if blob.len() < NONCE_LEN {
        return Err(CryptoError::InvalidCiphertext {
            minimum: NONCE_LEN,
            actual: blob.len(),
        });
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);

    cipher_for(key)
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Re-key an encrypted blob.
///
/// Returns the new key and the blob re-encrypted under it. The plaintext
/// is zeroized before returning.
///
/// # Errors
///
/// Propagates any decryption, encryption or entropy failure.
pub fn rotate(old_key: &SecretKey, blob: &[u8]) -> Result<(SecretKey, Vec<u8>), CryptoError> {
    let mut plaintext = decrypt(old_key, blob)?;
    let new_key = SecretKey::generate()?;
    let sealed = encrypt(&new_key, &plaintext);
    plaintext.zeroize();
    Ok((new_key, sealed?))
}
