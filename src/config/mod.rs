//! Configuration loading and hierarchy management
//!
//! Precedence: CLI > environment > TOML file > defaults. CLI overrides are applied
//! by the command layer after [`AppConfig::load`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::rules::QualityOverridePolicy;
use crate::error::{SmartCutError, SmartCutResult};
use crate::ports::LogLevel;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "smartcut.toml";

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub probe: ProbeConfig,
    pub logging: LoggingConfig,
    pub encoding: EncodingConfig,
}

/// `[probe]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// ffprobe executable (name on PATH or absolute path)
    pub ffprobe_path: String,
    /// Scan keyframes in-process (requires the `libav` feature)
    pub use_libav: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: if cfg!(windows) { "ffprobe.exe" } else { "ffprobe" }.to_string(),
            use_libav: false,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// `[encoding]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// Encoder for smart cut bridging segments; the source codec when unset
    pub encoder: Option<String>,
    pub quality_override_policy: QualityOverridePolicy,
}

impl AppConfig {
    /// Load defaults, then `explicit` (or `smartcut.toml` if present), then environment.
    ///
    /// Not validated yet: CLI overrides may still replace invalid values, so callers
    /// run [`AppConfig::validate`] once those are applied.
    pub fn load(explicit: Option<&Path>) -> SmartCutResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_file(path: &Path) -> SmartCutResult<Self> {
        if !path.is_file() {
            return Err(SmartCutError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SmartCutResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `SMARTCUT_*` overrides using `lookup` to read variables
    pub fn apply_env_with<F>(&mut self, lookup: F) -> SmartCutResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = 0;

        if let Some(path) = lookup("SMARTCUT_FFPROBE") {
            self.probe.ffprobe_path = path;
            overrides += 1;
        }
        if let Some(level) = lookup("SMARTCUT_LOG_LEVEL") {
            self.logging.level = level;
            overrides += 1;
        }
        if let Some(json) = lookup("SMARTCUT_LOG_JSON") {
            self.logging.json = parse_bool("SMARTCUT_LOG_JSON", &json)?;
            overrides += 1;
        }
        if let Some(encoder) = lookup("SMARTCUT_ENCODER") {
            self.encoding.encoder = Some(encoder);
            overrides += 1;
        }
        if let Some(policy) = lookup("SMARTCUT_OVERRIDE_POLICY") {
            self.encoding.quality_override_policy = QualityOverridePolicy::parse(&policy)?;
            overrides += 1;
        }

        if overrides > 0 {
            debug!("Applied {} environment variable overrides", overrides);
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SmartCutResult<()> {
        LogLevel::parse(&self.logging.level)?;

        if self.probe.ffprobe_path.trim().is_empty() {
            return Err(SmartCutError::InvalidConfig {
                message: "probe.ffprobe_path cannot be empty".to_string(),
            });
        }
        if let Some(encoder) = &self.encoding.encoder {
            if encoder.trim().is_empty() {
                return Err(SmartCutError::InvalidConfig {
                    message: "encoding.encoder cannot be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> SmartCutResult<LogLevel> {
        Ok(LogLevel::parse(&self.logging.level)?)
    }
}

fn parse_bool(key: &str, value: &str) -> SmartCutResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SmartCutError::InvalidConfig {
            message: format!("Invalid boolean value for {}: {}", key, value),
        }),
    }
}
