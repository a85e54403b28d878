// Codec parameter deriver - Encode parameters for a smart cut bridging segment

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Derives bitrate, encoder and timebase so the re-encoded bridge matches its source
pub struct CodecParameterDeriver {
    fs_port: Arc<dyn FsPort>,
    classifier: Arc<dyn StreamClassifier>,
    log_port: Arc<dyn LogPort>,
}

impl CodecParameterDeriver {
    /// Create new deriver with injected ports
    pub fn new(
        fs_port: Arc<dyn FsPort>,
        classifier: Arc<dyn StreamClassifier>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            fs_port,
            classifier,
            log_port,
        }
    }

    /// Derive [`CodecParams`] for the single real video stream in `streams`.
    ///
    /// The file is only stat'd when the stream reports no usable bit rate.
    pub async fn derive(
        &self,
        file_path: &str,
        file_duration: Option<f64>,
        streams: &[StreamDescriptor],
    ) -> Result<CodecParams, DomainError> {
        let video_streams = self.classifier.real_video_streams(streams);
        let video_stream = match video_streams.as_slice() {
            [stream] => *stream,
            other => {
                return Err(DomainError::InternalError(format!(
                    "Smart cut supports exactly one video stream, found {}",
                    other.len()
                )))
            }
        };

        let source_bitrate = match BitrateEstimator::parse_reported(video_stream.bit_rate.as_deref())
        {
            Some(bitrate) => bitrate as f64,
            None => self.estimate_bitrate(file_path, file_duration).await?,
        };
        let video_bitrate = BitrateEstimator::with_safety_margin(source_bitrate);

        let codec_name = video_stream.codec_name.as_deref().ok_or_else(|| {
            DomainError::InternalError(format!(
                "Video stream {} reports no codec",
                video_stream.index
            ))
        })?;
        let video_codec = target_encoder_for_codec(codec_name).to_string();

        let video_timebase = match video_stream.time_base.as_deref().map(Timebase::parse) {
            Some(Ok(timebase)) => Some(timebase),
            Some(Err(e)) => {
                self.log_port
                    .warn(&format!("Unable to parse timebase, using default: {}", e))
                    .await;
                None
            }
            None => {
                self.log_port
                    .warn("Video stream reports no timebase, using default")
                    .await;
                None
            }
        };

        self.log_port
            .debug(&format!(
                "Smart cut encode parameters: codec={} bitrate={} timebase={:?}",
                video_codec, video_bitrate, video_timebase
            ))
            .await;

        Ok(CodecParams {
            video_stream: video_stream.clone(),
            video_codec,
            video_bitrate,
            video_timebase,
        })
    }

    async fn estimate_bitrate(
        &self,
        file_path: &str,
        file_duration: Option<f64>,
    ) -> Result<f64, DomainError> {
        let size = self.fs_port.file_size(file_path).await?;
        let bitrate = BitrateEstimator::estimate_from_size(size, file_duration).ok_or_else(|| {
            DomainError::InternalError(
                "Video stream has no bit rate and file duration is unknown; cannot estimate bitrate"
                    .to_string(),
            )
        })?;

        self.log_port
            .warn(&format!(
                "Video stream has no usable bit rate, estimated {:.0} bit/s from file size",
                bitrate
            ))
            .await;
        Ok(bitrate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockFsAdapter, RecordingLogAdapter};

    fn deriver(fs: MockFsAdapter) -> (CodecParameterDeriver, Arc<RecordingLogAdapter>) {
        let log = Arc::new(RecordingLogAdapter::new());
        (
            CodecParameterDeriver::new(
                Arc::new(fs),
                Arc::new(RealVideoStreamClassifier),
                Arc::clone(&log) as Arc<dyn LogPort>,
            ),
            log,
        )
    }

    #[tokio::test]
    async fn test_reported_bitrate_with_margin() {
        let (deriver, _log) = deriver(MockFsAdapter::new());
        let streams = vec![StreamDescriptor::video(0, "h264")
            .with_bit_rate("5000000")
            .with_time_base("1/90000")];

        let params = deriver.derive("in.mp4", Some(60.0), &streams).await.unwrap();

        assert_eq!(params.video_bitrate, 6_000_000);
        assert_eq!(params.video_codec, "h264");
        assert_eq!(params.video_timebase, Some(Timebase { num: 1, den: 90000 }));
        assert_eq!(params.video_stream.index, 0);
    }

    #[tokio::test]
    async fn test_bitrate_estimated_from_file_size() {
        let (deriver, log) = deriver(MockFsAdapter::new().with_file("in.mp4", 12_500_000));
        let streams = vec![StreamDescriptor::video(0, "hevc")
            .with_bit_rate("N/A")
            .with_time_base("1/15360")];

        let params = deriver.derive("in.mp4", Some(100.0), &streams).await.unwrap();

        assert_eq!(params.video_bitrate, 1_200_000);
        assert!(log
            .messages(LogLevel::Warn)
            .iter()
            .any(|m| m.contains("estimated")));
    }

    #[tokio::test]
    async fn test_missing_bitrate_and_duration_fails() {
        let (deriver, _log) = deriver(MockFsAdapter::new().with_file("in.mp4", 12_500_000));
        let streams = vec![StreamDescriptor::video(0, "h264")];

        let err = deriver.derive("in.mp4", None, &streams).await.unwrap_err();
        assert!(matches!(err, DomainError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_requires_exactly_one_real_video_stream() {
        let (deriver, _log) = deriver(MockFsAdapter::new());

        let two = vec![
            StreamDescriptor::video(0, "h264").with_bit_rate("1000"),
            StreamDescriptor::video(1, "h264").with_bit_rate("1000"),
        ];
        assert!(matches!(
            deriver.derive("in.mp4", Some(10.0), &two).await,
            Err(DomainError::InternalError(_))
        ));

        let none: Vec<StreamDescriptor> = vec![];
        assert!(matches!(
            deriver.derive("in.mp4", Some(10.0), &none).await,
            Err(DomainError::InternalError(_))
        ));
    }

    #[tokio::test]
    async fn test_cover_art_is_not_a_real_video_stream() {
        let (deriver, _log) = deriver(MockFsAdapter::new());
        let streams = vec![
            StreamDescriptor::video(0, "h264").with_bit_rate("2000000"),
            StreamDescriptor::video(1, "mjpeg").with_attached_pic(),
        ];

        let params = deriver.derive("in.mp4", None, &streams).await.unwrap();
        assert_eq!(params.video_stream.index, 0);
        assert_eq!(params.video_bitrate, 2_400_000);
    }

    #[tokio::test]
    async fn test_av1_maps_to_software_encoder() {
        let (deriver, _log) = deriver(MockFsAdapter::new());
        let streams = vec![StreamDescriptor::video(0, "av1").with_bit_rate("1000000")];

        let params = deriver.derive("in.mkv", None, &streams).await.unwrap();
        assert_eq!(params.video_codec, "libsvtav1");
    }

    #[tokio::test]
    async fn test_missing_codec_fails() {
        let (deriver, _log) = deriver(MockFsAdapter::new());
        let streams = vec![StreamDescriptor {
            codec_name: None,
            ..StreamDescriptor::video(0, "h264").with_bit_rate("1000000")
        }];

        let err = deriver.derive("in.mp4", None, &streams).await.unwrap_err();
        assert!(matches!(err, DomainError::InternalError(_)));
    }

    #[tokio::test]
    async fn test_unparseable_timebase_is_not_fatal() {
        let (deriver, log) = deriver(MockFsAdapter::new());
        let streams = vec![StreamDescriptor::video(0, "h264")
            .with_bit_rate("1000000")
            .with_time_base("0/0")];

        let params = deriver.derive("in.mp4", None, &streams).await.unwrap();
        assert_eq!(params.video_timebase, None);
        assert!(log
            .messages(LogLevel::Warn)
            .iter()
            .any(|m| m.contains("timebase")));
    }

    #[tokio::test]
    async fn test_stat_failure_propagates() {
        let (deriver, _log) = deriver(MockFsAdapter::new());
        let streams = vec![StreamDescriptor::video(0, "h264")];

        let err = deriver.derive("missing.mp4", Some(10.0), &streams).await.unwrap_err();
        assert!(matches!(err, DomainError::FsFail(_)));
    }
}
