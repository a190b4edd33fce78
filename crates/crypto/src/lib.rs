//! Cryptographic primitives for Shopify request verification.
//!
//! This crate provides:
//! - HMAC-SHA256 digests encoded as hex (OAuth query flow) or base64 (webhooks)
//! - Constant-time comparison of supplied and computed signatures

#![warn(missing_docs)]

mod digest;
mod error;
mod timing;

#[cfg(feature = "wasm")]
mod wasm;

pub use digest::{compute_digest, hmac_sha256, verify_digest, DigestEncoding};
pub use error::{CryptoError, Result};
pub use timing::constant_time_compare;
