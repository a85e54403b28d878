// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;

/// Port for keyframe index lookups
#[async_trait]
pub trait KeyframePort: Send + Sync {
    /// Keyframes of `stream_index` within roughly `[around - window, around + window]`,
    /// ascending by time. May be empty.
    async fn query_keyframes(
        &self,
        file_path: &str,
        stream_index: usize,
        around: f64,
        window: f64,
    ) -> Result<Vec<Keyframe>, DomainError>;
}

/// Streams and container-level facts of a probed file
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    pub streams: Vec<StreamDescriptor>,
    /// Container duration in seconds, when known
    pub duration: Option<f64>,
    pub format_name: Option<String>,
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    async fn probe_streams(&self, file_path: &str) -> Result<ProbeReport, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError>;

    /// Get file size in bytes
    async fn file_size(&self, file_path: &str) -> Result<u64, DomainError>;
}

/// Picks the genuinely decodable video streams out of a probe result
pub trait StreamClassifier: Send + Sync {
    fn real_video_streams<'a>(&self, streams: &'a [StreamDescriptor]) -> Vec<&'a StreamDescriptor>;
}

/// Port for diagnostics. Never blocks, never affects control flow.
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
