// Domain models - Core types and data structures

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::errors::DomainError;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        // Try parsing as seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(DomainError::BadArgs(
                    "Time must be a non-negative number".to_string(),
                ));
            }
            return Ok(Self::from_seconds(seconds));
        }

        // Try parsing as HH:MM:SS.ms or MM:SS.ms
        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds_part) = match parts.as_slice() {
            [minutes, seconds] => (0, Self::parse_unit(minutes, "minutes")?, *seconds),
            [hours, minutes, seconds] => {
                let minutes = Self::parse_unit(minutes, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs(
                        "Minutes must be less than 60".to_string(),
                    ));
                }
                (Self::parse_unit(hours, "hours")?, minutes, *seconds)
            }
            _ => {
                return Err(DomainError::BadArgs(
                    "Invalid time format. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)".to_string(),
                ))
            }
        };

        let seconds = seconds_part
            .parse::<f64>()
            .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
        if !(0.0..60.0).contains(&seconds) {
            return Err(DomainError::BadArgs(
                "Seconds must be less than 60".to_string(),
            ));
        }

        Ok(Self::from_seconds(
            hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
        ))
    }

    fn parse_unit(value: &str, name: &str) -> Result<u32, DomainError> {
        value
            .parse::<u32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid {} format", name)))
    }

    /// Format as HH:MM:SS.ms (hours omitted when zero)
    pub fn format_hms(&self) -> String {
        let total_ms = (self.seconds * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let seconds = (total_ms % 60_000) / 1000;
        let milliseconds = total_ms % 1000;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Timebase for timestamp calculations - represents rational number for timestamp conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timebase {
    pub num: i32,
    pub den: i32,
}

impl Timebase {
    /// Create a new timebase
    pub fn new(num: i32, den: i32) -> Result<Self, DomainError> {
        if den == 0 {
            return Err(DomainError::BadArgs(
                "Timebase denominator cannot be zero".to_string(),
            ));
        }
        if num <= 0 || den < 0 {
            return Err(DomainError::BadArgs(format!(
                "Timebase must be positive, got {}/{}",
                num, den
            )));
        }
        Ok(Self { num, den })
    }

    /// Parse a `num/den` fraction as reported by probe tools
    pub fn parse(fraction: &str) -> Result<Self, DomainError> {
        let (num, den) = fraction
            .trim()
            .split_once('/')
            .ok_or_else(|| DomainError::BadArgs(format!("Invalid timebase: {}", fraction)))?;
        let num = num
            .trim()
            .parse::<i32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid timebase numerator: {}", fraction)))?;
        let den = den
            .trim()
            .parse::<i32>()
            .map_err(|_| DomainError::BadArgs(format!("Invalid timebase denominator: {}", fraction)))?;
        Self::new(num, den)
    }

    /// Convert PTS to seconds
    pub fn pts_to_seconds(&self, pts: i64) -> f64 {
        pts as f64 * f64::from(self.num) / f64::from(self.den)
    }
}

impl fmt::Display for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// A point a decoder can start from without preceding frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Presentation time in seconds
    pub time: f64,
}

impl Keyframe {
    pub fn at(time: f64) -> Self {
        Self { time }
    }
}

/// Stream type as reported in the probe `codec_type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Stream disposition flags (probe reports them as 0/1 integers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Disposition {
    #[serde(default, deserialize_with = "int_flag")]
    pub default: bool,
    #[serde(default, deserialize_with = "int_flag")]
    pub forced: bool,
    /// Cover art / embedded picture
    #[serde(default, deserialize_with = "int_flag")]
    pub attached_pic: bool,
    #[serde(default, deserialize_with = "int_flag")]
    pub timed_thumbnails: bool,
}

fn int_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Int(i64),
        Bool(bool),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Int(value) => value != 0,
        Flag::Bool(value) => value,
    })
}

/// One stream of a probed media file, following the probe tool's JSON schema
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub index: usize,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub codec_type: StreamType,
    /// Bit rate as a numeric string; may be missing or garbage
    #[serde(default)]
    pub bit_rate: Option<String>,
    /// Time base as a `num/den` fraction
    #[serde(default)]
    pub time_base: Option<String>,
    #[serde(default)]
    pub disposition: Disposition,
}

impl StreamDescriptor {
    /// Create a video stream descriptor
    pub fn video(index: usize, codec_name: &str) -> Self {
        Self {
            index,
            codec_name: Some(codec_name.to_string()),
            codec_type: StreamType::Video,
            ..Self::default()
        }
    }

    pub fn with_bit_rate(mut self, bit_rate: &str) -> Self {
        self.bit_rate = Some(bit_rate.to_string());
        self
    }

    pub fn with_time_base(mut self, time_base: &str) -> Self {
        self.time_base = Some(time_base.to_string());
        self
    }

    pub fn with_attached_pic(mut self) -> Self {
        self.disposition.attached_pic = true;
        self
    }
}

/// Outcome of resolving a trim start point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CutDecision {
    /// Point from which stream copy can start
    pub lossless_cut_from: f64,
    /// Whether `[desired, lossless_cut_from)` must be re-encoded
    pub segment_needs_smart_cut: bool,
}

impl CutDecision {
    pub fn lossless(at: f64) -> Self {
        Self {
            lossless_cut_from: at,
            segment_needs_smart_cut: false,
        }
    }

    pub fn smart_cut(next_keyframe: f64) -> Self {
        Self {
            lossless_cut_from: next_keyframe,
            segment_needs_smart_cut: true,
        }
    }
}

/// Encode parameters for the bridging segment of a smart cut
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodecParams {
    pub video_stream: StreamDescriptor,
    pub video_codec: String,
    /// Bits per second, safety margin already applied
    pub video_bitrate: u64,
    pub video_timebase: Option<Timebase>,
}
