//! Dependency injection container wiring adapters into interactors

use std::sync::Arc;

use crate::adapters::{FFprobeAdapter, LocalFsAdapter, TracingLogAdapter};
use crate::app::smart_cut_interactor::SmartCutInteractor;
use crate::config::AppConfig;
use crate::domain::errors::DomainError;
use crate::domain::rules::RealVideoStreamClassifier;
use crate::ports::{FsPort, KeyframePort, LogPort, ProbePort, StreamClassifier};

pub trait AppContainer: Send + Sync {
    fn smart_cut_interactor(&self) -> Arc<SmartCutInteractor>;

    /// Keyframe source selected by configuration
    fn keyframe_port(&self) -> Arc<dyn KeyframePort>;
}

pub struct DefaultAppContainer {
    smart_cut_interactor: Arc<SmartCutInteractor>,
    keyframe_port: Arc<dyn KeyframePort>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let ffprobe = Arc::new(FFprobeAdapter::new(&config.probe.ffprobe_path)?);
        let keyframe_port = Self::select_keyframe_port(config, &ffprobe)?;
        let fs_port = Arc::new(LocalFsAdapter::new());
        let log_port = Arc::new(TracingLogAdapter::new());
        let classifier = Arc::new(RealVideoStreamClassifier);

        let smart_cut_interactor = Arc::new(
            SmartCutInteractor::new(
                Arc::clone(&ffprobe) as Arc<dyn ProbePort>,
                Arc::clone(&keyframe_port),
                fs_port as Arc<dyn FsPort>,
                classifier as Arc<dyn StreamClassifier>,
                log_port as Arc<dyn LogPort>,
            )
            .with_override_policy(config.encoding.quality_override_policy),
        );

        Ok(Self {
            smart_cut_interactor,
            keyframe_port,
        })
    }

    #[cfg(feature = "libav")]
    fn select_keyframe_port(
        config: &AppConfig,
        ffprobe: &Arc<FFprobeAdapter>,
    ) -> Result<Arc<dyn KeyframePort>, DomainError> {
        if config.probe.use_libav {
            let libav = crate::adapters::LibavKeyframeAdapter::new()?;
            return Ok(Arc::new(libav));
        }
        Ok(Arc::clone(ffprobe) as Arc<dyn KeyframePort>)
    }

    #[cfg(not(feature = "libav"))]
    fn select_keyframe_port(
        config: &AppConfig,
        ffprobe: &Arc<FFprobeAdapter>,
    ) -> Result<Arc<dyn KeyframePort>, DomainError> {
        if config.probe.use_libav {
            return Err(DomainError::BadArgs(
                "libav keyframe scanning requested but this build lacks the `libav` feature"
                    .to_string(),
            ));
        }
        Ok(Arc::clone(ffprobe) as Arc<dyn KeyframePort>)
    }
}

impl AppContainer for DefaultAppContainer {
    fn smart_cut_interactor(&self) -> Arc<SmartCutInteractor> {
        Arc::clone(&self.smart_cut_interactor)
    }

    fn keyframe_port(&self) -> Arc<dyn KeyframePort> {
        Arc::clone(&self.keyframe_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_container_builds() {
        let container = DefaultAppContainer::new(&AppConfig::default()).unwrap();
        let interactor = container.smart_cut_interactor();
        assert!(Arc::ptr_eq(&interactor, &container.smart_cut_interactor()));
    }

    #[test]
    fn test_empty_ffprobe_path_rejected() {
        let mut config = AppConfig::default();
        config.probe.ffprobe_path = String::new();
        assert!(matches!(
            DefaultAppContainer::new(&config),
            Err(DomainError::BadArgs(_))
        ));
    }

    #[cfg(not(feature = "libav"))]
    #[test]
    fn test_libav_requires_feature() {
        let mut config = AppConfig::default();
        config.probe.use_libav = true;
        assert!(DefaultAppContainer::new(&config).is_err());
    }
}
