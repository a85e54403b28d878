//! Quality-control dialects of the supported encoder backends
//!
//! A logical "quality" knob means different things to different encoders:
//! software encoders take a rate factor, NVENC a constant-quality target,
//! QuickSync a global quality, AMF a pair of quantizers, VideoToolbox a fixed
//! quality scale, and VAAPI nothing at all. Everything here is a pure lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Quality scale value VideoToolbox encoders always receive
pub const VIDEOTOOLBOX_QUALITY_SCALE: u32 = 65;

/// How an encoder family expresses its quality setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QualityDialect {
    /// `-crf`
    RateFactor,
    /// `-cq` (NVENC)
    ConstantQuality,
    /// `-global_quality` (QuickSync)
    GlobalQuality,
    /// `-qp_i` and `-qp_p` with the same value (AMF)
    DualQp,
    /// `-q` with a fixed value, no tunable quality (VideoToolbox)
    FixedQualityScale,
    /// Bitrate/QP-only hardware, no quality arguments
    NoQuality,
}

/// Defaults and dialect for one encoder family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncoderProfile {
    pub quality: Option<u32>,
    pub preset: Option<&'static str>,
    pub dialect: QualityDialect,
}

/// What to do with a quality override aimed at a family without a numeric dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityOverridePolicy {
    /// Refuse the override
    #[default]
    Reject,
    /// Emit it through the generic rate-factor flag anyway
    PassThrough,
}

impl QualityOverridePolicy {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "pass-through" | "passthrough" => Ok(Self::PassThrough),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid quality override policy: {}. Valid policies: reject, pass-through",
                value
            ))),
        }
    }
}

/// Encoder families known to the quality mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EncoderFamily {
    SoftwareH264,
    SoftwareH265,
    SoftwareAv1,
    NvencH264,
    NvencH265,
    NvencAv1,
    VideoToolbox,
    QsvH264,
    QsvH265,
    QsvAv1,
    Vaapi,
    AmfH264,
    AmfH265,
    AmfAv1,
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodecKind {
    H264,
    H265,
    Av1,
}

impl CodecKind {
    fn detect(encoder: &str) -> Option<Self> {
        if encoder.contains("av1") {
            Some(Self::Av1)
        } else if encoder.contains("hevc") || encoder.contains("265") {
            Some(Self::H265)
        } else if encoder.contains("h264") || encoder.contains("264") || encoder.contains("avc") {
            Some(Self::H264)
        } else {
            None
        }
    }
}

impl EncoderFamily {
    pub const ALL: [EncoderFamily; 15] = [
        Self::SoftwareH264,
        Self::SoftwareH265,
        Self::SoftwareAv1,
        Self::NvencH264,
        Self::NvencH265,
        Self::NvencAv1,
        Self::VideoToolbox,
        Self::QsvH264,
        Self::QsvH265,
        Self::QsvAv1,
        Self::Vaapi,
        Self::AmfH264,
        Self::AmfH265,
        Self::AmfAv1,
        Self::Unrecognized,
    ];

    /// Classify an encoder identifier by exact name, then by backend substring
    pub fn from_encoder(encoder: &str) -> Self {
        let name = encoder.trim().to_ascii_lowercase();

        match name.as_str() {
            "libx264" => return Self::SoftwareH264,
            "libx265" => return Self::SoftwareH265,
            "libsvtav1" => return Self::SoftwareAv1,
            _ => {}
        }

        if name.contains("videotoolbox") {
            return Self::VideoToolbox;
        }
        if name.contains("vaapi") {
            return Self::Vaapi;
        }

        let codec = CodecKind::detect(&name);
        if name.contains("nvenc") {
            match codec {
                Some(CodecKind::H264) => Self::NvencH264,
                Some(CodecKind::H265) => Self::NvencH265,
                Some(CodecKind::Av1) => Self::NvencAv1,
                None => Self::Unrecognized,
            }
        } else if name.contains("qsv") {
            match codec {
                Some(CodecKind::H264) => Self::QsvH264,
                Some(CodecKind::H265) => Self::QsvH265,
                Some(CodecKind::Av1) => Self::QsvAv1,
                None => Self::Unrecognized,
            }
        } else if name.contains("amf") {
            match codec {
                Some(CodecKind::H264) => Self::AmfH264,
                Some(CodecKind::H265) => Self::AmfH265,
                Some(CodecKind::Av1) => Self::AmfAv1,
                None => Self::Unrecognized,
            }
        } else {
            Self::Unrecognized
        }
    }

    pub fn profile(self) -> EncoderProfile {
        use QualityDialect::*;

        let (quality, preset, dialect) = match self {
            Self::SoftwareH264 => (Some(23), Some("medium"), RateFactor),
            Self::SoftwareH265 => (Some(28), Some("medium"), RateFactor),
            Self::SoftwareAv1 => (Some(35), Some("6"), RateFactor),
            Self::NvencH264 => (Some(23), Some("p4"), ConstantQuality),
            Self::NvencH265 => (Some(28), Some("p4"), ConstantQuality),
            Self::NvencAv1 => (Some(30), Some("p4"), ConstantQuality),
            Self::VideoToolbox => (None, None, FixedQualityScale),
            Self::QsvH264 => (Some(23), Some("medium"), GlobalQuality),
            Self::QsvH265 => (Some(28), Some("medium"), GlobalQuality),
            Self::QsvAv1 => (Some(30), Some("medium"), GlobalQuality),
            Self::Vaapi => (None, None, NoQuality),
            Self::AmfH264 => (Some(23), Some("balanced"), DualQp),
            Self::AmfH265 => (Some(28), Some("balanced"), DualQp),
            Self::AmfAv1 => (Some(30), Some("balanced"), DualQp),
            Self::Unrecognized => (None, None, NoQuality),
        };

        EncoderProfile {
            quality,
            preset,
            dialect,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SoftwareH264 => "software H.264",
            Self::SoftwareH265 => "software H.265",
            Self::SoftwareAv1 => "software AV1",
            Self::NvencH264 => "NVENC H.264",
            Self::NvencH265 => "NVENC H.265",
            Self::NvencAv1 => "NVENC AV1",
            Self::VideoToolbox => "VideoToolbox",
            Self::QsvH264 => "QuickSync H.264",
            Self::QsvH265 => "QuickSync H.265",
            Self::QsvAv1 => "QuickSync AV1",
            Self::Vaapi => "VAAPI",
            Self::AmfH264 => "AMD AMF H.264",
            Self::AmfH265 => "AMD AMF H.265",
            Self::AmfAv1 => "AMD AMF AV1",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for EncoderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Translates a quality/preset choice into encoder arguments
pub struct EncoderQualityMapper;

impl EncoderQualityMapper {
    /// Default CRF/CQ-equivalent value, if the family has a numeric quality knob
    pub fn optimal_quality(encoder: &str) -> Option<u32> {
        EncoderFamily::from_encoder(encoder).profile().quality
    }

    /// Default speed/quality preset token
    pub fn optimal_preset(encoder: &str) -> Option<&'static str> {
        EncoderFamily::from_encoder(encoder).profile().preset
    }

    pub fn supports_quality_value(encoder: &str) -> bool {
        Self::optimal_quality(encoder).is_some()
    }

    /// Quality arguments for output stream `output_index`, rejecting quality
    /// overrides the encoder cannot express
    pub fn build_quality_arguments(
        encoder: &str,
        output_index: usize,
        custom_quality: Option<u32>,
        custom_preset: Option<&str>,
    ) -> Result<Vec<String>, DomainError> {
        Self::build_quality_arguments_with_policy(
            encoder,
            output_index,
            custom_quality,
            custom_preset,
            QualityOverridePolicy::default(),
        )
    }

    pub fn build_quality_arguments_with_policy(
        encoder: &str,
        output_index: usize,
        custom_quality: Option<u32>,
        custom_preset: Option<&str>,
        policy: QualityOverridePolicy,
    ) -> Result<Vec<String>, DomainError> {
        let family = EncoderFamily::from_encoder(encoder);
        let profile = family.profile();

        let quality = custom_quality.or(profile.quality);
        let preset = custom_preset.or(profile.preset);

        let mut args = Vec::new();

        if let Some(quality) = quality {
            let value = quality.to_string();
            match profile.dialect {
                QualityDialect::ConstantQuality => {
                    args.extend([format!("-cq:v:{}", output_index), value]);
                }
                QualityDialect::GlobalQuality => {
                    args.extend([format!("-global_quality:v:{}", output_index), value]);
                }
                QualityDialect::DualQp => {
                    args.extend([
                        format!("-qp_i:v:{}", output_index),
                        value.clone(),
                        format!("-qp_p:v:{}", output_index),
                        value,
                    ]);
                }
                QualityDialect::RateFactor => {
                    args.extend([format!("-crf:v:{}", output_index), value]);
                }
                QualityDialect::FixedQualityScale | QualityDialect::NoQuality => match policy {
                    QualityOverridePolicy::Reject => {
                        return Err(DomainError::BadArgs(format!(
                            "Encoder {} ({}) does not accept a quality value",
                            encoder, family
                        )));
                    }
                    QualityOverridePolicy::PassThrough => {
                        args.extend([format!("-crf:v:{}", output_index), value]);
                    }
                },
            }
        }

        if let Some(preset) = preset {
            args.extend([format!("-preset:v:{}", output_index), preset.to_string()]);
        }

        if profile.dialect == QualityDialect::FixedQualityScale {
            args.extend([
                format!("-q:v:{}", output_index),
                VIDEOTOOLBOX_QUALITY_SCALE.to_string(),
            ]);
        }

        Ok(args)
    }
}
