//! Verification results and their HTTP mapping.

use serde::Serialize;
use shopify_guards_core::{Error as CoreError, ErrorCode};
use std::fmt;
use thiserror::Error;

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// Secret or parameter/header name not configured (operator error)
    MissingConfig,
    /// The request carried no signature, or no raw body to check it against
    MissingSignature,
    /// The signature did not match the computed digest
    SignatureMismatch,
    /// Signature valid but `timestamp` older than the configured leeway
    TimestampExpired,
    /// `shop` does not match the configured domain pattern
    ShopInvalid,
}

impl DenialReason {
    /// Fixed client-facing message. Identical for the first three reasons
    /// so a caller cannot tell configuration problems from bad signatures.
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingConfig | Self::MissingSignature | Self::SignatureMismatch => {
                "HMAC validation failed"
            }
            Self::TimestampExpired => "HMAC timestamp expired",
            Self::ShopInvalid => "Shop parameter invalid",
        }
    }

    /// Stable snake_case name for logs and counters
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingConfig => "missing_config",
            Self::MissingSignature => "missing_signature",
            Self::SignatureMismatch => "signature_mismatch",
            Self::TimestampExpired => "timestamp_expired",
            Self::ShopInvalid => "shop_invalid",
        }
    }

    /// Code used when the denial becomes a core error
    pub fn error_code(self) -> ErrorCode {
        match self {
            Self::MissingConfig => ErrorCode::ConfigError,
            Self::MissingSignature => ErrorCode::MissingSignature,
            Self::SignatureMismatch => ErrorCode::SignatureMismatch,
            Self::TimestampExpired => ErrorCode::TimestampExpired,
            Self::ShopInvalid => ErrorCode::ShopInvalid,
        }
    }

    /// Every reason, in check order
    pub const ALL: [DenialReason; 5] = [
        Self::MissingConfig,
        Self::MissingSignature,
        Self::SignatureMismatch,
        Self::TimestampExpired,
        Self::ShopInvalid,
    ];
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one verification call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum VerificationOutcome {
    /// The request may proceed
    Allowed,
    /// The request must be answered with 401
    Denied(DenialReason),
}

impl VerificationOutcome {
    /// True for [`Allowed`](Self::Allowed)
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Reason for a denial, `None` when allowed
    pub fn denial_reason(&self) -> Option<DenialReason> {
        match self {
            Self::Allowed => None,
            Self::Denied(reason) => Some(*reason),
        }
    }

    /// `Err` for a denial, ready for `?` in a handler
    pub fn into_result(self) -> Result<(), Unauthorized> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(reason) => Err(Unauthorized { reason }),
        }
    }
}

/// A denial as an error value; maps to HTTP 401
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", .reason.message())]
pub struct Unauthorized {
    /// Why the request was denied
    pub reason: DenialReason,
}

impl Unauthorized {
    /// HTTP status for every denial
    pub const STATUS: u16 = 401;

    /// Same as [`STATUS`](Self::STATUS)
    pub fn status(&self) -> u16 {
        Self::STATUS
    }
}

impl From<Unauthorized> for CoreError {
    fn from(err: Unauthorized) -> Self {
        CoreError::security(err.reason.error_code(), err.reason.message())
            .with_context(format!("denial reason: {}", err.reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(DenialReason::MissingConfig.message(), "HMAC validation failed");
        assert_eq!(DenialReason::MissingSignature.message(), "HMAC validation failed");
        assert_eq!(DenialReason::SignatureMismatch.message(), "HMAC validation failed");
        assert_eq!(DenialReason::TimestampExpired.message(), "HMAC timestamp expired");
        assert_eq!(DenialReason::ShopInvalid.message(), "Shop parameter invalid");
    }

    #[test]
    fn test_into_result() {
        assert_eq!(VerificationOutcome::Allowed.into_result(), Ok(()));

        let err = VerificationOutcome::Denied(DenialReason::TimestampExpired)
            .into_result()
            .unwrap_err();
        assert_eq!(err.status(), 401);
        assert_eq!(err.to_string(), "HMAC timestamp expired");
    }

    #[test]
    fn test_unauthorized_into_core_error() {
        let err: CoreError = Unauthorized { reason: DenialReason::ShopInvalid }.into();
        assert_eq!(err.code, ErrorCode::ShopInvalid);
        assert_eq!(err.code.category(), "Security");
        assert_eq!(err.message, "Shop parameter invalid");
    }

    #[test]
    fn test_all_reasons_are_security_or_config_codes() {
        for reason in DenialReason::ALL {
            let category = reason.error_code().category();
            assert!(category == "Security" || category == "Configuration");
        }
    }

    #[test]
    fn test_reason_serializes_snake_case() {
        for reason in DenialReason::ALL {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }
}
