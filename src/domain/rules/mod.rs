// Domain rules - Business logic and policies

pub mod encoder_quality;

pub use encoder_quality::{
    EncoderFamily, EncoderProfile, EncoderQualityMapper, QualityDialect, QualityOverridePolicy,
};

use crate::domain::model::*;
use crate::ports::StreamClassifier;

/// Search window around the desired cut point, in seconds
pub const KEYFRAME_SEARCH_WINDOW: f64 = 10.0;

/// Window used for the single retry when the first search finds nothing
pub const WIDENED_KEYFRAME_SEARCH_WINDOW: f64 = 60.0;

/// Margin over the source bitrate to absorb re-encode overhead and quality loss
pub const BITRATE_SAFETY_MARGIN: f64 = 1.2;

/// Decide a cut from one keyframe query result.
///
/// An exact match is a lossless cut; otherwise the earliest keyframe at or after
/// `desired` becomes the smart-cut boundary. `None` means the window held no
/// usable keyframe.
pub fn decide_cut(keyframes: &[Keyframe], desired: f64) -> Option<CutDecision> {
    if keyframes.iter().any(|kf| kf.time == desired) {
        return Some(CutDecision::lossless(desired));
    }

    keyframes
        .iter()
        .map(|kf| kf.time)
        .filter(|&time| time >= desired)
        .min_by(|a, b| a.total_cmp(b))
        .map(CutDecision::smart_cut)
}

/// Default stream classifier: video streams that are not cover art or thumbnails
#[derive(Debug, Default, Clone, Copy)]
pub struct RealVideoStreamClassifier;

impl StreamClassifier for RealVideoStreamClassifier {
    fn real_video_streams<'a>(&self, streams: &'a [StreamDescriptor]) -> Vec<&'a StreamDescriptor> {
        streams
            .iter()
            .filter(|stream| stream.codec_type == StreamType::Video)
            .filter(|stream| {
                !stream.disposition.attached_pic && !stream.disposition.timed_thumbnails
            })
            .collect()
    }
}

/// Bitrate rules for the bridging segment
pub struct BitrateEstimator;

impl BitrateEstimator {
    /// Parse the probe-reported bit rate
    pub fn parse_reported(bit_rate: Option<&str>) -> Option<u64> {
        bit_rate.and_then(|value| value.trim().parse::<u64>().ok())
    }

    /// Average bitrate of the whole file; `None` without a usable duration
    pub fn estimate_from_size(size_bytes: u64, duration_seconds: Option<f64>) -> Option<f64> {
        duration_seconds
            .filter(|duration| duration.is_finite() && *duration > 0.0)
            .map(|duration| size_bytes as f64 * 8.0 / duration)
    }

    pub fn with_safety_margin(bitrate: f64) -> u64 {
        (bitrate * BITRATE_SAFETY_MARGIN).floor().max(0.0) as u64
    }
}

/// Encoder to use for a probed codec name
pub fn target_encoder_for_codec(codec_name: &str) -> &str {
    match codec_name {
        "av1" => "libsvtav1",
        other => other,
    }
}

#[cfg(test)]
mod tests;
