//! Webhook delivery verification.
//!
//! Shopify POSTs webhook payloads with a base64 HMAC-SHA256 of the raw body
//! in `X-Shopify-Hmac-SHA256`.
//!
//! See <https://shopify.dev/docs/apps/build/webhooks/subscribe/https#step-2-validate-the-origin-of-your-webhook-to-ensure-its-coming-from-shopify>

use serde::Serialize;
use shopify_guards_core::config::Settings;
use shopify_guards_crypto::{compute_digest, constant_time_compare, DigestEncoding};
use std::sync::Arc;
use tracing::{debug, debug_span, warn};

use crate::guard::RequestGuard;
use crate::metrics;
use crate::outcome::{DenialReason, VerificationOutcome};
use crate::request::RequestDescriptor;

const FLOW: &str = "webhook";

/// Verify a webhook request's body signature
pub fn verify_body(req: &RequestDescriptor, settings: &Settings) -> VerificationOutcome {
    if req.method() != "POST" {
        debug!(method = req.method(), "Webhook HMAC check skipped for non-POST request");
        metrics::record_exempt(FLOW);
        return VerificationOutcome::Allowed;
    }

    let meta = WebhookMetadata::from_request(req, settings);
    let _span = debug_span!(
        "verify_body",
        shop_domain = meta.shop_domain.as_deref(),
        request_id = meta.request_id.as_deref(),
    )
    .entered();

    match check(req, settings) {
        Ok(()) => {
            debug!("Webhook HMAC verified");
            metrics::record_allowed(FLOW);
            VerificationOutcome::Allowed
        }
        Err(reason) => {
            warn!(
                reason = %reason,
                header = settings.header_hmac(),
                "Webhook HMAC verification denied"
            );
            metrics::record_denied(FLOW, reason);
            VerificationOutcome::Denied(reason)
        }
    }
}

fn check(req: &RequestDescriptor, settings: &Settings) -> Result<(), DenialReason> {
    let Some(body) = req.raw_body() else {
        return Err(DenialReason::MissingSignature);
    };

    let secret = settings.api_secret_key();
    let header = settings.header_hmac();
    if secret.is_empty() || header.is_empty() {
        return Err(DenialReason::MissingConfig);
    }

    let supplied = match req.headers().get(header) {
        Some(hmac) if !hmac.is_empty() => hmac,
        _ => return Err(DenialReason::MissingSignature),
    };

    let digest = compute_digest(secret.as_bytes(), body, DigestEncoding::Base64);
    if constant_time_compare(supplied.as_bytes(), digest.as_bytes()) {
        Ok(())
    } else {
        Err(DenialReason::SignatureMismatch)
    }
}

/// Base64 HMAC of a raw body, i.e. the value Shopify sends in the header
pub fn sign_body(body: &[u8], secret: &[u8]) -> String {
    compute_digest(secret, body, DigestEncoding::Base64)
}

/// Descriptive delivery headers. Not covered by the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebhookMetadata {
    /// Store that sent the delivery
    pub shop_domain: Option<String>,
    /// Shopify's id for the delivery
    pub request_id: Option<String>,
    /// API version the payload is rendered in
    pub api_version: Option<String>,
}

impl WebhookMetadata {
    /// Read the configured metadata headers from a request
    pub fn from_request(req: &RequestDescriptor, settings: &Settings) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            shop_domain: header(settings.header_shop_domain()),
            request_id: header(settings.header_request_id()),
            api_version: header(settings.header_api_version()),
        }
    }
}

/// Guard for webhook endpoints
pub struct WebhookGuard {
    settings: Arc<Settings>,
}

impl WebhookGuard {
    /// Guard sharing `settings` with other guards
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Settings this guard verifies with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl RequestGuard for WebhookGuard {
    fn check(&self, req: &RequestDescriptor) -> VerificationOutcome {
        verify_body(req, &self.settings)
    }
}
