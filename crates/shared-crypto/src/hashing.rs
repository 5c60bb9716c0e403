//! # Asset Fingerprints
//!
//! BLAKE3 digests of asset plaintext. A contract records the digest of the
//! asset it was posted with; settlement checks the rotated plaintext still
//! hashes to the same value.

use crate::CryptoError;

/// BLAKE3 hash output (256-bit).
pub type Hash = [u8; 32];

/// Hash data with BLAKE3 (one-shot).
pub fn blake3_hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Fingerprint of an asset plaintext.
pub fn asset_fingerprint(plaintext: &[u8]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"sealed-bid-exchange/asset/v1");
    hasher.update(plaintext);
    *hasher.finalize().as_bytes()
}

/// Check a plaintext against a recorded fingerprint.
///
/// # Errors
///
/// Returns `CryptoError::FingerprintMismatch` with both digests hex-encoded.
pub fn verify_fingerprint(expected: &Hash, plaintext: &[u8]) -> Result<(), CryptoError> {
    let actual = asset_fingerprint(plaintext);
    // blake3::Hash equality is constant-time
    if blake3::Hash::from(actual) == blake3::Hash::from(*expected) {
        return Ok(());
    }
    Err(CryptoError::FingerprintMismatch {
        expected: to_hex(expected),
        actual: to_hex(&actual),
    })
}

fn to_hex(hash: &Hash) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
