//! Error handling module for SmartCut

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for configuration, logging and I/O around the planning core
#[derive(Error, Debug)]
pub enum SmartCutError {
    /// Configuration file missing or unreadable
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration value out of range or inconsistent
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Logging subscriber could not be installed
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    /// Planning core error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parse error
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for SmartCut operations
pub type SmartCutResult<T> = std::result::Result<T, SmartCutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let json: SmartCutError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(json, SmartCutError::Json(_)));

        let domain: SmartCutError = DomainError::BadArgs("bad".to_string()).into();
        assert_eq!(domain.to_string(), "Bad arguments: bad");
    }
}
