//! Canonical form of an OAuth query string.
//!
//! Shopify signs `k1=v1&k2=v2...` with the `hmac` parameter removed and the
//! remaining keys sorted. Verification must rebuild exactly those bytes.

use percent_encoding::percent_decode_str;
use shopify_guards_crypto::{compute_digest, DigestEncoding};
use std::borrow::Cow;
use url::form_urlencoded;

use crate::request::QueryParams;

fn form_encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Build the string the signer hashed: every parameter except `exclude`,
/// form-encoded as `key=value`, sorted by key, joined with `&`, then
/// percent-decoded once.
///
/// The final decode restores everything except spaces, which stay `+`.
/// Multi-valued keys are signed comma-joined.
pub fn canonical_query(params: &QueryParams, exclude: &str) -> String {
    let mut entries: Vec<(&str, Cow<'_, str>)> = params
        .iter()
        .filter(|(key, _)| *key != exclude)
        .map(|(key, value)| (key, value.joined()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let encoded = entries
        .iter()
        .map(|(key, value)| format!("{}={}", form_encode(key), form_encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    percent_decode_str(&encoded).decode_utf8_lossy().into_owned()
}

/// Hex HMAC of the canonical query, i.e. the value Shopify puts in `hmac`
pub fn sign_query(params: &QueryParams, secret: &[u8], hmac_param: &str) -> String {
    compute_digest(
        secret,
        canonical_query(params, hmac_param).as_bytes(),
        DigestEncoding::Hex,
    )
}
