//! Decision Engine: `(policy, identity, resource) -> Verdict`.
//!
//! Pure and allocation-free; linear in the number of grants of one identity.

use super::{Policy, ResourceBinding};

/// Outcome of a single authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Forward to the next handler.
    Allow,
    /// Identity present but not entitled to the resource.
    Forbidden,
    /// No identity was asserted for the request.
    Unauthenticated,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Allow => "allow",
            Verdict::Forbidden => "forbidden",
            Verdict::Unauthenticated => "unauthenticated",
        }
    }

    /// HTTP status the pipeline short-circuits with; `None` means forward.
    pub fn status_code(self) -> Option<u16> {
        match self {
            Verdict::Allow => None,
            Verdict::Forbidden => Some(403),
            Verdict::Unauthenticated => Some(401),
        }
    }

    pub fn is_allow(self) -> bool {
        matches!(self, Verdict::Allow)
    }
}

/// Evaluate `identity` against `policy` for `resource`.
///
/// An empty `identity` means no identity was asserted upstream.
pub fn decide(policy: &Policy, identity: &str, resource: &str) -> Verdict {
    if identity.is_empty() {
        return Verdict::Unauthenticated;
    }
    if policy.is_allowed(identity, resource) {
        Verdict::Allow
    } else {
        Verdict::Forbidden
    }
}

impl Policy {
    /// Decide for a request bound to `resource`.
    pub fn decide(&self, identity: &str, resource: &ResourceBinding) -> Verdict {
        decide(self, identity, resource.as_str())
    }
}
