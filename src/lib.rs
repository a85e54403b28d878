//! SmartCut planning library
//!
//! Keyframe-aware trim planning for ffmpeg-based cutters: finds where a lossless
//! stream copy can start, and when the requested start lies between keyframes,
//! derives the codec parameters and encoder arguments for the re-encoded bridge.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{
    CodecParameterDeriver, CutPointResolver, EncodePlan, SmartCutInteractor, SmartCutPlan,
    SmartCutRequest,
};
pub use config::AppConfig;
pub use domain::errors::DomainError;
pub use domain::model::{CodecParams, CutDecision, Keyframe, StreamDescriptor, TimeSpec, Timebase};
pub use domain::rules::{EncoderFamily, EncoderQualityMapper, QualityOverridePolicy};
pub use error::{SmartCutError, SmartCutResult};
