//! HMAC verification for Shopify OAuth redirects and webhook deliveries.
//!
//! Two verifiers share one settings value and one digest/compare primitive:
//!
//! - [`verify_query`]: `GET` requests carrying `hmac` (hex) in the query string
//! - [`verify_body`]: `POST` webhook deliveries carrying a base64 HMAC header
//!
//! Both are pure functions of `(request, settings)` and return a
//! [`VerificationOutcome`]; a web framework maps `Denied` to HTTP 401 with
//! [`DenialReason::message`].
//!
//! # Example
//!
//! ```rust
//! use shopify_guards::{verify_body, sign_body, RequestDescriptor, VerificationOutcome};
//! use shopify_guards_core::config::SettingsOverrides;
//!
//! let settings = SettingsOverrides::new().api_secret_key("shhh").resolve();
//!
//! let body = br#"{"id":1}"#;
//! let req = RequestDescriptor::post()
//!     .with_raw_body(body.to_vec())
//!     .with_header("X-Shopify-Hmac-Sha256", sign_body(body, b"shhh"));
//!
//! assert_eq!(verify_body(&req, &settings), VerificationOutcome::Allowed);
//! ```

#![warn(clippy::all)]

mod canonical;
mod clock;
mod guard;
mod metrics;
mod outcome;
mod query;
mod request;
mod webhook;

pub use canonical::{canonical_query, sign_query};
pub use clock::{Clock, FixedClock, SystemClock};
pub use guard::RequestGuard;
pub use metrics::verification_metrics;
pub use outcome::{DenialReason, Unauthorized, VerificationOutcome};
pub use query::{verify_query, verify_query_at, AuthGuard};
pub use request::{Headers, QueryParams, QueryValue, RequestDescriptor};
pub use webhook::{sign_body, verify_body, WebhookGuard, WebhookMetadata};
