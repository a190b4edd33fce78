//! HMAC-SHA256 digest computation.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{CryptoError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Text encoding applied to a raw HMAC digest.
///
/// Shopify signs OAuth query strings with lowercase hex and webhook bodies
/// with standard padded base64; the two are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestEncoding {
    /// Lowercase hexadecimal (64 chars)
    Hex,
    /// Standard base64 with padding (44 chars)
    Base64,
}

impl DigestEncoding {
    /// Encode raw digest bytes.
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => STANDARD.encode(bytes),
        }
    }
}

/// Compute the raw HMAC-SHA256 of `message` keyed by `key`.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Compute an encoded HMAC-SHA256 digest.
///
/// # Arguments
/// * `secret` - Shared secret bytes
/// * `canonical_input` - Exact bytes the signer hashed
/// * `encoding` - Output encoding expected by the caller
pub fn compute_digest(secret: &[u8], canonical_input: &[u8], encoding: DigestEncoding) -> String {
    encoding.encode(&hmac_sha256(secret, canonical_input))
}

/// Check a supplied signature against the digest of `canonical_input`.
///
/// # Returns
/// Ok(()) if the signature matches, Err otherwise
pub fn verify_digest(
    secret: &[u8],
    canonical_input: &[u8],
    encoding: DigestEncoding,
    supplied: &str,
) -> Result<()> {
    if secret.is_empty() {
        return Err(CryptoError::EmptyKey);
    }
    let expected = compute_digest(secret, canonical_input, encoding);
    if crate::constant_time_compare(supplied.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(CryptoError::SignatureMismatch)
    }
}
