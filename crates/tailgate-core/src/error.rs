//! Shared error types across tailgate crates.

use thiserror::Error;

/// Stable error codes (used by the loader and in logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Config file is malformed or fails validation.
    BadConfig,
    /// Authorization policy failed to build.
    BadPolicy,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error (I/O, runtime).
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and test assertions.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::BadPolicy => "BAD_POLICY",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// What went wrong while building a policy or a resource binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildErrorKind {
    #[error("user {0} already defined")]
    DuplicateUser(String),
    #[error("no resources specified for user {0}")]
    NoResources(String),
    #[error("cannot combine wildcard '*' with other resources")]
    WildcardCombined(String),
    #[error("unrecognized directive: {0}")]
    UnrecognizedDirective(String),
    #[error("wrong argument count or unexpected line ending after '{0}'")]
    ArgumentCount(String),
    #[error("user identity must not be empty")]
    EmptyIdentity,
    #[error("wildcard '*' not allowed as resource name")]
    WildcardBinding,
}

/// Build-time error. Fatal to the whole configuration load: no partial
/// policy is ever returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}{}", line_suffix(.line))]
pub struct BuildError {
    /// 1-based line of the offending directive, when built from text.
    pub line: Option<usize>,
    pub kind: BuildErrorKind,
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(l) => format!(", at line {l}"),
        None => String::new(),
    }
}

impl BuildError {
    pub fn new(kind: BuildErrorKind) -> Self {
        Self { line: None, kind }
    }

    pub fn at(line: usize, kind: BuildErrorKind) -> Self {
        Self { line: Some(line), kind }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TailgateError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum TailgateError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("invalid policy: {0}")]
    Policy(#[from] BuildError),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TailgateError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TailgateError::Config(_) => ErrorCode::BadConfig,
            TailgateError::Policy(_) => ErrorCode::BadPolicy,
            TailgateError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            TailgateError::Internal(_) => ErrorCode::Internal,
        }
    }
}
