//! Resolved verification settings
//!
//! [`SettingsOverrides`] holds whatever the embedding application supplied;
//! [`SettingsOverrides::resolve`] merges it over the built-in defaults and
//! yields an immutable [`Settings`] that verifiers only ever read.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default header carrying the webhook HMAC
pub const DEFAULT_HEADER_HMAC: &str = "x-shopify-hmac-sha256";
/// Default header carrying the shop domain of a webhook delivery
pub const DEFAULT_HEADER_SHOP_DOMAIN: &str = "shopify-shop-domain";
/// Default header carrying the request id of a webhook delivery
pub const DEFAULT_HEADER_REQUEST_ID: &str = "shopify-request-id";
/// Default header carrying the API version of a webhook payload
pub const DEFAULT_HEADER_API_VERSION: &str = "shopify-api-version";
/// Default query parameter carrying the OAuth HMAC
pub const DEFAULT_QUERY_HMAC: &str = "hmac";
/// Default maximum age of a signed `timestamp` parameter (one day)
pub const DEFAULT_TIMESTAMP_LEEWAY_SECS: u64 = 86_400;
/// Pattern for `<alnum><alnum-or-hyphen>*.myshopify.com`
pub const DEFAULT_SHOP_DOMAIN_PATTERN: &str = r"^[a-zA-Z0-9][a-zA-Z0-9\-]*\.myshopify\.com$";

static DEFAULT_SHOP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_SHOP_DOMAIN_PATTERN).expect("default shop pattern is valid"));

/// The shared app secret.
///
/// Never printed by `Debug`; wiped from memory on drop. Deserializes from a
/// plain string so settings files never hold the secret in a bare `String`.
#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct ApiSecretKey(String);

impl ApiSecretKey {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw key bytes for HMAC keying
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// True when no secret has been configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in bytes, for diagnostics
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for ApiSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiSecretKey(<unset>)")
        } else {
            f.write_str("ApiSecretKey(***)")
        }
    }
}

/// Immutable, fully-resolved verification settings
#[derive(Debug, Clone)]
pub struct Settings {
    api_secret_key: ApiSecretKey,
    header_hmac: String,
    query_hmac: String,
    header_shop_domain: String,
    header_request_id: String,
    header_api_version: String,
    timestamp_leeway_secs: u64,
    shop_regex: Option<Regex>,
}

impl Settings {
    /// Merge `overrides` over the defaults
    pub fn resolve(overrides: SettingsOverrides) -> Self {
        overrides.resolve()
    }

    /// Shared secret; empty when unconfigured
    pub fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Header name for the webhook HMAC
    pub fn header_hmac(&self) -> &str {
        &self.header_hmac
    }

    /// Query parameter name for the OAuth HMAC
    pub fn query_hmac(&self) -> &str {
        &self.query_hmac
    }

    /// Header name for the webhook shop domain
    pub fn header_shop_domain(&self) -> &str {
        &self.header_shop_domain
    }

    /// Header name for the webhook request id
    pub fn header_request_id(&self) -> &str {
        &self.header_request_id
    }

    /// Header name for the webhook API version
    pub fn header_api_version(&self) -> &str {
        &self.header_api_version
    }

    /// Maximum accepted age of the `timestamp` query parameter, in seconds
    pub fn timestamp_leeway_secs(&self) -> u64 {
        self.timestamp_leeway_secs
    }

    /// Maximum accepted age of the `timestamp` query parameter
    pub fn timestamp_leeway(&self) -> Duration {
        Duration::from_secs(self.timestamp_leeway_secs)
    }

    /// Pattern the `shop` query parameter must match, if any
    pub fn shop_regex(&self) -> Option<&Regex> {
        self.shop_regex.as_ref()
    }

    /// True when a secret is present, i.e. verification can ever succeed
    pub fn is_configured(&self) -> bool {
        !self.api_secret_key.is_empty()
    }

    /// Secret-free view for display and JSON output
    pub fn summary(&self) -> SettingsSummary {
        SettingsSummary {
            secret_configured: self.is_configured(),
            header_hmac: self.header_hmac.clone(),
            query_hmac: self.query_hmac.clone(),
            header_shop_domain: self.header_shop_domain.clone(),
            header_request_id: self.header_request_id.clone(),
            header_api_version: self.header_api_version.clone(),
            timestamp_leeway_secs: self.timestamp_leeway_secs,
            shop_regex: self.shop_regex.as_ref().map(|r| r.as_str().to_string()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        SettingsOverrides::default().resolve()
    }
}

/// Serializable description of [`Settings`] that omits the secret
#[derive(Debug, Clone, Serialize)]
pub struct SettingsSummary {
    /// Whether a non-empty secret is set
    pub secret_configured: bool,
    /// Webhook HMAC header name
    pub header_hmac: String,
    /// OAuth HMAC query parameter name
    pub query_hmac: String,
    /// Webhook shop domain header name
    pub header_shop_domain: String,
    /// Webhook request id header name
    pub header_request_id: String,
    /// Webhook API version header name
    pub header_api_version: String,
    /// Maximum `timestamp` age in seconds
    pub timestamp_leeway_secs: u64,
    /// Source of the shop pattern, if one is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_regex: Option<String>,
}

/// Partial settings supplied by the embedding application
///
/// Every `None` falls back to the default during [`resolve`](Self::resolve).
/// An explicit empty string is kept as-is and disables the corresponding
/// check (verifiers then deny with a missing-config reason).
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// Shared app secret
    pub api_secret_key: Option<ApiSecretKey>,
    /// Webhook HMAC header name
    pub header_hmac: Option<String>,
    /// OAuth HMAC query parameter name
    pub query_hmac: Option<String>,
    /// Webhook shop domain header name
    pub header_shop_domain: Option<String>,
    /// Webhook request id header name
    pub header_request_id: Option<String>,
    /// Webhook API version header name
    pub header_api_version: Option<String>,
    /// Maximum `timestamp` age in seconds
    pub timestamp_leeway_secs: Option<u64>,
    /// Pattern `shop` must match
    pub shop_regex: Option<Regex>,
}

impl SettingsOverrides {
    /// Empty overrides; resolves to the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared secret
    pub fn api_secret_key(mut self, secret: impl Into<String>) -> Self {
        self.api_secret_key = Some(ApiSecretKey::new(secret));
        self
    }

    /// Set the webhook HMAC header name
    pub fn header_hmac(mut self, name: impl Into<String>) -> Self {
        self.header_hmac = Some(name.into());
        self
    }

    /// Set the OAuth HMAC query parameter name
    pub fn query_hmac(mut self, name: impl Into<String>) -> Self {
        self.query_hmac = Some(name.into());
        self
    }

    /// Set the shop domain header name
    pub fn header_shop_domain(mut self, name: impl Into<String>) -> Self {
        self.header_shop_domain = Some(name.into());
        self
    }

    /// Set the request id header name
    pub fn header_request_id(mut self, name: impl Into<String>) -> Self {
        self.header_request_id = Some(name.into());
        self
    }

    /// Set the API version header name
    pub fn header_api_version(mut self, name: impl Into<String>) -> Self {
        self.header_api_version = Some(name.into());
        self
    }

    /// Set the maximum `timestamp` age in seconds
    pub fn timestamp_leeway_secs(mut self, secs: u64) -> Self {
        self.timestamp_leeway_secs = Some(secs);
        self
    }

    /// Require `shop` to match `pattern`
    pub fn shop_regex(mut self, pattern: Regex) -> Self {
        self.shop_regex = Some(pattern);
        self
    }

    /// Validate `shop` against [`DEFAULT_SHOP_DOMAIN_PATTERN`]
    pub fn default_shop_regex(self) -> Self {
        self.shop_regex(DEFAULT_SHOP_REGEX.clone())
    }

    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn merge(self, other: SettingsOverrides) -> Self {
        Self {
            api_secret_key: other.api_secret_key.or(self.api_secret_key),
            header_hmac: other.header_hmac.or(self.header_hmac),
            query_hmac: other.query_hmac.or(self.query_hmac),
            header_shop_domain: other.header_shop_domain.or(self.header_shop_domain),
            header_request_id: other.header_request_id.or(self.header_request_id),
            header_api_version: other.header_api_version.or(self.header_api_version),
            timestamp_leeway_secs: other.timestamp_leeway_secs.or(self.timestamp_leeway_secs),
            shop_regex: other.shop_regex.or(self.shop_regex),
        }
    }

    /// Apply over the defaults. Never fails.
    pub fn resolve(self) -> Settings {
        Settings {
            api_secret_key: self.api_secret_key.unwrap_or_default(),
            header_hmac: self
                .header_hmac
                .unwrap_or_else(|| DEFAULT_HEADER_HMAC.to_string()),
            query_hmac: self
                .query_hmac
                .unwrap_or_else(|| DEFAULT_QUERY_HMAC.to_string()),
            header_shop_domain: self
                .header_shop_domain
                .unwrap_or_else(|| DEFAULT_HEADER_SHOP_DOMAIN.to_string()),
            header_request_id: self
                .header_request_id
                .unwrap_or_else(|| DEFAULT_HEADER_REQUEST_ID.to_string()),
            header_api_version: self
                .header_api_version
                .unwrap_or_else(|| DEFAULT_HEADER_API_VERSION.to_string()),
            timestamp_leeway_secs: self
                .timestamp_leeway_secs
                .unwrap_or(DEFAULT_TIMESTAMP_LEEWAY_SECS),
            shop_regex: self.shop_regex,
        }
    }
}

/// Merge `overrides` over the defaults
pub fn resolve(overrides: SettingsOverrides) -> Settings {
    overrides.resolve()
}
