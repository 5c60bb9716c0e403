//! # Shared Crypto - Asset Custody Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305 | Asset encryption and key rotation |
//! | `hashing` | BLAKE3 | Asset fingerprints |
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit random nonce per encryption, AEAD tag on every blob
//! - **Keys**: zeroized on drop, never printed by `Debug`
//! - **Entropy**: RNG failure surfaces as a fatal [`CryptoError::EntropyUnavailable`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{asset_fingerprint, blake3_hash, verify_fingerprint, Hash};
pub use symmetric::{decrypt, encrypt, rotate, Nonce, SecretKey, KEY_LEN, NONCE_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
