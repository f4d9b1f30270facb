//! Shared error type across entguard crates.

use thiserror::Error;

/// Stable error codes surfaced to callers of guarded operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A privacy rule denied the operation.
    PolicyDenied,
    /// A store round-trip made on behalf of a rule failed.
    Upstream,
    /// The request deadline elapsed.
    DeadlineExceeded,
    /// Policy configuration rejected at load time.
    InvalidConfig,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::PolicyDenied => "POLICY_DENIED",
            ErrorCode::Upstream => "UPSTREAM",
            ErrorCode::DeadlineExceeded => "DEADLINE_EXCEEDED",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Unified error type used by core and engine.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("privacy: deny rule: {0}")]
    PolicyDenied(String),
    #[error("upstream: {0}")]
    Upstream(String),
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GuardError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            GuardError::PolicyDenied(_) => ErrorCode::PolicyDenied,
            GuardError::Upstream(_) => ErrorCode::Upstream,
            GuardError::DeadlineExceeded => ErrorCode::DeadlineExceeded,
            GuardError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            GuardError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Deny reason when this error came out of a privacy rule chain.
    pub fn deny_reason(&self) -> Option<&str> {
        match self {
            GuardError::PolicyDenied(reason) => Some(reason),
            _ => None,
        }
    }
}
