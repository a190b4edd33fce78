//! Outcome counters for both verifiers.

use once_cell::sync::Lazy;
use shopify_guards_telemetry::MetricsRegistry;

use crate::outcome::DenialReason;

const COUNTERS: &[&str] = &[
    "query.exempt",
    "query.allowed",
    "query.denied.missing_config",
    "query.denied.missing_signature",
    "query.denied.signature_mismatch",
    "query.denied.timestamp_expired",
    "query.denied.shop_invalid",
    "webhook.exempt",
    "webhook.allowed",
    "webhook.denied.missing_config",
    "webhook.denied.missing_signature",
    "webhook.denied.signature_mismatch",
];

static METRICS: Lazy<MetricsRegistry> = Lazy::new(|| MetricsRegistry::with_counters(COUNTERS));

/// Process-wide verification counters
pub fn verification_metrics() -> &'static MetricsRegistry {
    &METRICS
}

pub(crate) fn record_exempt(flow: &str) {
    METRICS.increment(&format!("{flow}.exempt"));
}

pub(crate) fn record_allowed(flow: &str) {
    METRICS.increment(&format!("{flow}.allowed"));
}

pub(crate) fn record_denied(flow: &str, reason: DenialReason) {
    METRICS.increment(&format!("{flow}.denied.{}", reason.as_str()));
}
