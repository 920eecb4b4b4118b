//! tailgate core: the authorization policy model, its directive parser, and
//! the request-time decision function.
//!
//! This crate carries no transport or runtime dependencies. A `Policy` is
//! built once from configuration, is immutable afterwards, and can be shared
//! across threads for concurrent `decide` calls without locking.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `BuildError`/`TailgateError` so a bad configuration can never
//! crash the host process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod directive;
pub mod error;
pub mod policy;

pub use error::{BuildError, BuildErrorKind, ErrorCode, Result, TailgateError};
pub use policy::{
    decide, parse_policy, AccessList, Policy, PolicyBuilder, ResourceBinding, UserEntry, Verdict,
    WILDCARD,
};
