//! Logging and counters for shopify-guards
//!
//! - Structured logging with `tracing`, filtered by `RUST_LOG`
//! - Fixed-name atomic counters for verification outcomes
//!
//! Counters are registered up front so incrementing never takes a lock;
//! the verification path stays lock-free.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with the default configuration
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize with custom configuration
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(fmt::layer().json().with_target(config.show_target).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub json: bool,
    pub show_target: bool,
    pub show_thread_ids: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json: false,
            show_target: false,
            show_thread_ids: false,
        }
    }
}

impl TelemetryConfig {
    /// Debug-level logging, for `--verbose`
    pub fn verbose() -> Self {
        Self {
            log_level: "debug".to_string(),
            show_target: true,
            ..Self::default()
        }
    }
}

/// A set of named counters fixed at construction
pub struct MetricsRegistry {
    counters: BTreeMap<&'static str, AtomicU64>,
    start_time: Instant,
}

impl MetricsRegistry {
    /// Register `names`, all starting at zero
    pub fn with_counters(names: &[&'static str]) -> Self {
        Self {
            counters: names.iter().map(|n| (*n, AtomicU64::new(0))).collect(),
            start_time: Instant::now(),
        }
    }

    /// Increment a counter. Unregistered names are ignored.
    pub fn increment(&self, name: &str) {
        match self.counters.get(name) {
            Some(counter) => {
                counter.fetch_add(1, Ordering::Relaxed);
            }
            None => tracing::debug!(metric = name, "Increment of unregistered counter"),
        }
    }

    /// Current value of a counter
    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters.get(name).map(|c| c.load(Ordering::Relaxed))
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Value {
        let counter_values: BTreeMap<&str, u64> = self
            .counters
            .iter()
            .map(|(k, v)| (*k, v.load(Ordering::Relaxed)))
            .collect();

        serde_json::json!({
            "session_id": session_id(),
            "uptime_secs": self.uptime_secs(),
            "counters": counter_values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counter() {
        let registry = MetricsRegistry::with_counters(&["allowed", "denied"]);
        registry.increment("allowed");
        registry.increment("allowed");
        registry.increment("denied");

        assert_eq!(registry.get("allowed"), Some(2));
        assert_eq!(registry.get("denied"), Some(1));
    }

    #[test]
    fn test_unregistered_counter_ignored() {
        let registry = MetricsRegistry::with_counters(&["allowed"]);
        registry.increment("nope");
        assert_eq!(registry.get("nope"), None);
        assert_eq!(registry.get("allowed"), Some(0));
    }

    #[test]
    fn test_export_json() {
        let registry = MetricsRegistry::with_counters(&["query.allowed"]);
        registry.increment("query.allowed");

        let json = registry.export_json();
        assert_eq!(json["counters"]["query.allowed"], 1);
        assert_eq!(json["session_id"], session_id());
    }

    #[test]
    fn test_concurrent_increments() {
        let registry = std::sync::Arc::new(MetricsRegistry::with_counters(&["hits"]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        registry.increment("hits");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.get("hits"), Some(8000));
    }

    #[test]
    fn test_session_id_stable() {
        assert_eq!(session_id(), session_id());
        assert_eq!(session_id().len(), 36);
    }

    #[test]
    fn test_verbose_config() {
        let config = TelemetryConfig::verbose();
        assert_eq!(config.log_level, "debug");
        assert!(!config.json);
    }
}
