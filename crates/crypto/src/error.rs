//! Error types for the crypto crate.

use thiserror::Error;

/// Result type alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during crypto operations.
///
/// Variants never carry digest or key material.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// The supplied signature did not match the computed digest
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// No signing key was available
    #[error("Signing key is empty")]
    EmptyKey,
}
