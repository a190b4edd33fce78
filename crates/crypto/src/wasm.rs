//! WASM bindings for edge runtimes that verify Shopify requests in JavaScript.

use wasm_bindgen::prelude::*;

use crate::DigestEncoding;

/// Hex HMAC-SHA256, as Shopify attaches to OAuth redirect query strings.
#[wasm_bindgen]
pub fn query_digest(secret: &str, canonical_query: &str) -> String {
    crate::compute_digest(secret.as_bytes(), canonical_query.as_bytes(), DigestEncoding::Hex)
}

/// Base64 HMAC-SHA256, as Shopify sends in the webhook HMAC header.
#[wasm_bindgen]
pub fn webhook_digest(secret: &str, raw_body: &[u8]) -> String {
    crate::compute_digest(secret.as_bytes(), raw_body, DigestEncoding::Base64)
}

/// Verify a webhook body against its header value.
#[wasm_bindgen]
pub fn verify_webhook(secret: &str, raw_body: &[u8], header_hmac: &str) -> bool {
    crate::verify_digest(secret.as_bytes(), raw_body, DigestEncoding::Base64, header_hmac).is_ok()
}

/// Constant-time comparison of two strings.
#[wasm_bindgen]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    crate::constant_time_compare(a.as_bytes(), b.as_bytes())
}
