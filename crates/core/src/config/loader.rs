//! Settings file loading
//!
//! Lives outside the verification engine: applications and the CLI call it,
//! then hand the resulting overrides to [`SettingsOverrides::resolve`].

use super::settings::{ApiSecretKey, SettingsOverrides};
use crate::error::{Error, Result, ResultExt};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root of a `shopify-guards.toml` file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// The `[shopify]` table; absent means all defaults
    #[serde(default)]
    pub shopify: ShopifySection,
}

/// The `[shopify]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShopifySection {
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
    /// Uncompiled `shop` pattern
    pub shop_regex: Option<String>,
}

impl ShopifySection {
    /// Compile the shop pattern and convert to resolver input
    pub fn into_overrides(self) -> Result<SettingsOverrides> {
        let shop_regex = match self.shop_regex {
            Some(pattern) => Some(Regex::new(&pattern).map_err(|e| {
                Error::invalid_config_value("shop_regex", e.to_string()).with_source(e)
            })?),
            None => None,
        };

        Ok(SettingsOverrides {
            api_secret_key: self.api_secret_key,
            header_hmac: self.header_hmac,
            query_hmac: self.query_hmac,
            header_shop_domain: self.header_shop_domain,
            header_request_id: self.header_request_id,
            header_api_version: self.header_api_version,
            timestamp_leeway_secs: self.timestamp_leeway_secs,
            shop_regex,
        })
    }
}

/// Settings overrides plus where they came from
#[derive(Debug, Clone)]
pub struct Config {
    /// Values read from the file
    pub overrides: SettingsOverrides,
    /// File the values came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load from an explicit path, or search the standard locations.
    ///
    /// An explicit path that does not exist is an error; finding nothing in
    /// the standard locations yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let overrides = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => SettingsOverrides::default(),
        };

        Ok(Self {
            overrides,
            path: config_path,
        })
    }

    /// Defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            overrides: SettingsOverrides::default(),
            path: None,
        }
    }
}

/// Parse settings from TOML text
pub fn parse_settings(content: &str) -> Result<SettingsOverrides> {
    let file: SettingsFile = toml::from_str(content)?;
    file.shopify.into_overrides()
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        ".shopify-guards.toml",
        "shopify-guards.toml",
        ".config/shopify-guards.toml",
    ];

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

fn load_config_file(path: &Path) -> Result<SettingsOverrides> {
    tracing::debug!(path = %path.display(), "Loading settings file");

    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path.display()))?;

    parse_settings(&content).context(format!("In config file {}", path.display()))
}
