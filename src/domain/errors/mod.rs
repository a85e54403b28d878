// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Recoverable condition the user can act on (e.g. pick another cut point)
    UserFacing(String),
    /// Invalid arguments provided
    BadArgs(String),
    /// File system failure (stat, read)
    FsFail(String),
    /// Media probing failure
    ProbeFail(String),
    /// Contract violation by the caller; not meant for end users verbatim
    InternalError(String),
}

impl DomainError {
    /// Whether the error should be shown to the user as-is
    pub fn is_user_facing(&self) -> bool {
        matches!(self, DomainError::UserFacing(_))
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::UserFacing(msg) => write!(f, "{}", msg),
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ProbeFail(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
