//! OAuth redirect verification.
//!
//! Shopify appends `hmac` (hex HMAC-SHA256 of the other parameters) to every
//! install and redirect URL it sends the merchant's browser to. Only `GET`
//! requests take part in that flow; anything else passes through.

use shopify_guards_core::config::Settings;
use shopify_guards_crypto::{compute_digest, constant_time_compare, DigestEncoding};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::canonical::canonical_query;
use crate::clock::{Clock, SystemClock};
use crate::guard::RequestGuard;
use crate::metrics;
use crate::outcome::{DenialReason, VerificationOutcome};
use crate::request::RequestDescriptor;

const FLOW: &str = "query";
const TIMESTAMP_PARAM: &str = "timestamp";
const SHOP_PARAM: &str = "shop";

/// Verify a query-signed request against the system clock
pub fn verify_query(req: &RequestDescriptor, settings: &Settings) -> VerificationOutcome {
    verify_query_at(req, settings, SystemClock.now_unix())
}

/// Verify a query-signed request as of `now` (Unix seconds)
pub fn verify_query_at(req: &RequestDescriptor, settings: &Settings, now: i64) -> VerificationOutcome {
    if req.method() != "GET" {
        debug!(method = req.method(), "Query HMAC check skipped for non-GET request");
        metrics::record_exempt(FLOW);
        return VerificationOutcome::Allowed;
    }

    match check(req, settings, now) {
        Ok(()) => {
            debug!("Query HMAC verified");
            metrics::record_allowed(FLOW);
            VerificationOutcome::Allowed
        }
        Err(reason) => {
            warn!(
                reason = %reason,
                param = settings.query_hmac(),
                "Query HMAC verification denied"
            );
            metrics::record_denied(FLOW, reason);
            VerificationOutcome::Denied(reason)
        }
    }
}

fn check(req: &RequestDescriptor, settings: &Settings, now: i64) -> Result<(), DenialReason> {
    let secret = settings.api_secret_key();
    let hmac_param = settings.query_hmac();
    if secret.is_empty() || hmac_param.is_empty() {
        return Err(DenialReason::MissingConfig);
    }

    let query = req.query();
    let supplied = match query.get_single(hmac_param) {
        Some(hmac) if !hmac.is_empty() => hmac,
        _ => return Err(DenialReason::MissingSignature),
    };

    let canonical = canonical_query(query, hmac_param);
    let digest = compute_digest(secret.as_bytes(), canonical.as_bytes(), DigestEncoding::Hex);
    if !constant_time_compare(supplied.as_bytes(), digest.as_bytes()) {
        return Err(DenialReason::SignatureMismatch);
    }

    if let Some(raw) = query.get(TIMESTAMP_PARAM) {
        match raw.as_single().and_then(|ts| ts.trim().parse::<i64>().ok()) {
            Some(timestamp) => {
                let leeway = i64::try_from(settings.timestamp_leeway_secs()).unwrap_or(i64::MAX);
                if now.saturating_sub(timestamp) > leeway {
                    return Err(DenialReason::TimestampExpired);
                }
            }
            None => debug!("Unparsable timestamp parameter; freshness check skipped"),
        }
    }

    if let (Some(value), Some(pattern)) = (query.get(SHOP_PARAM), settings.shop_regex()) {
        // a repeated `shop` cannot name one store
        let valid = value.as_single().is_some_and(|shop| pattern.is_match(shop));
        if !valid {
            return Err(DenialReason::ShopInvalid);
        }
    }

    Ok(())
}

/// Guard for OAuth install/redirect endpoints
pub struct AuthGuard<C: Clock = SystemClock> {
    settings: Arc<Settings>,
    clock: C,
}

impl AuthGuard {
    /// Guard checked against the system clock
    pub fn new(settings: Arc<Settings>) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> AuthGuard<C> {
    /// Guard checked against `clock`, e.g. a [`FixedClock`](crate::FixedClock) in tests
    pub fn with_clock(settings: Arc<Settings>, clock: C) -> Self {
        Self { settings, clock }
    }

    /// Settings this guard verifies with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl<C: Clock> RequestGuard for AuthGuard<C> {
    fn check(&self, req: &RequestDescriptor) -> VerificationOutcome {
        verify_query_at(req, &self.settings, self.clock.now_unix())
    }
}
