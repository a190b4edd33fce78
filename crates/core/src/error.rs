//! Structured errors with codes, context and recovery suggestions
//!
//! Used by the settings loader, settings validation and the operator CLI.
//! Messages never embed secret values or computed digests.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
///
/// The thousands digit is the category: 2 IO, 3 configuration, 7 denied
/// request. Numbers are stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Reading a settings file failed
    IoError = 2000,
    /// A settings file path does not exist
    FileNotFound = 2001,
    /// A settings file is not readable
    PermissionDenied = 2002,

    /// Settings are unusable (e.g. an empty parameter name)
    ConfigError = 3000,
    /// An explicit `--config` path does not exist
    ConfigNotFound = 3001,
    /// A settings file is not valid TOML or has unknown keys
    ConfigParseError = 3002,
    /// Settings validation reported errors
    ConfigValidationError = 3003,
    /// A single settings value is malformed
    InvalidConfigValue = 3004,
    /// No app secret is configured
    MissingSecret = 3005,

    /// The request carried no signature
    MissingSignature = 7001,
    /// The signature did not match
    SignatureMismatch = 7002,
    /// The signed timestamp is older than the leeway
    TimestampExpired = 7003,
    /// The `shop` parameter failed the domain pattern
    ShopInvalid = 7004,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            _ => "Security",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    /// An explicit settings path that does not exist
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .shopify-guards.toml file or use --config to specify a path")
    }

    /// A malformed value for one settings field
    pub fn invalid_config_value(field: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfigValue,
            format!("Invalid value for `{}`: {}", field, reason.into()),
        )
    }

    /// No app secret anywhere in the settings chain
    pub fn missing_secret() -> Self {
        Self::new(ErrorCode::MissingSecret, "Shopify API secret key is not configured")
            .with_suggestion(
                "Set `api_secret_key` in the [shopify] table or export SHOPIFY_API_SECRET",
            )
    }

    /// A denied request, carrying one of the 7xxx codes
    pub fn security(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }
}

/// Serializable error report for logging and API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Code as displayed, e.g. `E3004`
    pub code_str: String,
    /// Category derived from the code
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Rendered source error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command succeeded; for verify commands, the request was allowed
    pub const SUCCESS: i32 = 0;
    /// `check-config` found errors in the settings
    pub const VALIDATION_ERROR: i32 = 2;
    /// Settings could not be loaded or lack a required value
    pub const CONFIG_ERROR: i32 = 3;
    /// The request was denied
    pub const SECURITY_ERROR: i32 = 5;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error, if any
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}
