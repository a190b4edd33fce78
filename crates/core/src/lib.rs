//! Core types for shopify-guards
//!
//! - **Settings**: defaults, caller overrides and the immutable resolved [`config::Settings`]
//! - **Settings files**: TOML loading for applications and the CLI
//! - **Validation**: startup checks for settings that would deny every request
//! - **Error handling**: structured errors with codes, context and suggestions
//!
//! # Example
//!
//! ```rust
//! use shopify_guards_core::config::SettingsOverrides;
//!
//! let settings = SettingsOverrides::new()
//!     .api_secret_key("my_client_secret")
//!     .timestamp_leeway_secs(300)
//!     .resolve();
//!
//! assert_eq!(settings.query_hmac(), "hmac");
//! assert_eq!(settings.header_hmac(), "x-shopify-hmac-sha256");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, Settings, SettingsOverrides};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::validation::{validate_settings, ValidationResult};
}
