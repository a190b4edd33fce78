//! The seam between a web framework and the verifiers.

use crate::outcome::{Unauthorized, VerificationOutcome};
use crate::request::RequestDescriptor;

/// A per-route request check.
///
/// Implementations hold their settings behind an `Arc` and keep no other
/// state, so one guard can serve every worker thread.
pub trait RequestGuard: Send + Sync {
    /// Decide whether the request may proceed
    fn check(&self, req: &RequestDescriptor) -> VerificationOutcome;

    /// [`check`](Self::check) as a `Result`, for `?` in handlers
    fn authorize(&self, req: &RequestDescriptor) -> Result<(), Unauthorized> {
        self.check(req).into_result()
    }
}
