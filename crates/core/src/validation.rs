//! Settings validation
//!
//! Resolution itself never fails, so a misconfigured deployment only shows
//! up as a stream of `MissingConfig` denials. [`validate_settings`] lets an
//! operator catch that at startup instead.
//!
//! # Example
//!
//! ```rust
//! use shopify_guards_core::config::SettingsOverrides;
//! use shopify_guards_core::validation::validate_settings;
//!
//! let settings = SettingsOverrides::new().api_secret_key("").resolve();
//! let result = validate_settings(&settings);
//! assert!(!result.is_valid());
//! ```

use crate::config::Settings;
use crate::error::{Error, ErrorCode, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// RFC 9110 `token` characters, which is all a header name may contain
static HEADER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[!#$%&'*+\-.^_`|~0-9A-Za-z]+$").expect("header name pattern is valid"));

/// Shopify app secrets are 32+ characters; anything much shorter is a typo
const MIN_SECRET_LEN: usize = 16;

/// Validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                ErrorCode::ConfigValidationError,
                format!("Settings validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
#[derive(Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    fn error(mut self, field: &str, code: &str, message: impl Into<String>) -> Self {
        self.result.add_error(ValidationError {
            field: field.to_string(),
            message: message.into(),
            code: code.to_string(),
        });
        self
    }

    /// Validate that a field is not empty
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.error(field, "REQUIRED", "Field is required")
        } else {
            self
        }
    }

    /// Validate that a non-empty value is a legal HTTP header name
    pub fn header_name(self, field: &str, value: &str) -> Self {
        if !value.is_empty() && !HEADER_NAME.is_match(value) {
            self.error(field, "INVALID_HEADER_NAME", "Must be a valid HTTP header name")
        } else {
            self
        }
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

/// Check resolved settings for values that make every verification fail or
/// that weaken it.
pub fn validate_settings(settings: &Settings) -> ValidationResult {
    let secret = settings.api_secret_key();
    let shop_pattern = settings.shop_regex().map(|r| r.as_str());

    let mut validator = Validator::new();
    if secret.is_empty() {
        validator = validator.error(
            "api_secret_key",
            "REQUIRED",
            "No secret configured; every signed request will be denied",
        );
    }

    validator
        .required("query_hmac", settings.query_hmac())
        .required("header_hmac", settings.header_hmac())
        .header_name("header_hmac", settings.header_hmac())
        .header_name("header_shop_domain", settings.header_shop_domain())
        .header_name("header_request_id", settings.header_request_id())
        .header_name("header_api_version", settings.header_api_version())
        .warn_if(
            "api_secret_key",
            !secret.is_empty() && secret.len() < MIN_SECRET_LEN,
            "Secret is unusually short for a Shopify app secret",
        )
        .warn_if(
            "timestamp_leeway_secs",
            settings.timestamp_leeway_secs() == 0,
            "Zero leeway rejects any timestamp older than the current second",
        )
        .warn_if(
            "shop_regex",
            shop_pattern.is_some_and(|p| !p.starts_with('^') || !p.ends_with('$')),
            "Pattern is not anchored with ^...$ and may accept look-alike domains",
        )
        .validate()
}
