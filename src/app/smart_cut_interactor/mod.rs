// Smart cut interactor - Orchestrates the cut planning use case

use std::sync::Arc;

use serde::Serialize;

use crate::app::codec_params_deriver::CodecParameterDeriver;
use crate::app::cut_point_resolver::CutPointResolver;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Interactor for planning a cut at a requested start time
pub struct SmartCutInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    classifier: Arc<dyn StreamClassifier>,
    log_port: Arc<dyn LogPort>,
    resolver: CutPointResolver,
    deriver: CodecParameterDeriver,
    override_policy: QualityOverridePolicy,
}

impl SmartCutInteractor {
    /// Create new smart cut interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        keyframe_port: Arc<dyn KeyframePort>,
        fs_port: Arc<dyn FsPort>,
        classifier: Arc<dyn StreamClassifier>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            resolver: CutPointResolver::new(keyframe_port, Arc::clone(&log_port)),
            deriver: CodecParameterDeriver::new(
                Arc::clone(&fs_port),
                Arc::clone(&classifier),
                Arc::clone(&log_port),
            ),
            probe_port,
            fs_port,
            classifier,
            log_port,
            override_policy: QualityOverridePolicy::default(),
        }
    }

    pub fn with_override_policy(mut self, policy: QualityOverridePolicy) -> Self {
        self.override_policy = policy;
        self
    }

    pub fn resolver(&self) -> &CutPointResolver {
        &self.resolver
    }

    pub fn deriver(&self) -> &CodecParameterDeriver {
        &self.deriver
    }

    /// Plan a cut starting at `request.cut_from`
    pub async fn plan(&self, request: SmartCutRequest) -> Result<SmartCutPlan, DomainError> {
        self.log_port
            .info(&format!(
                "Planning cut for {} at {}",
                request.input_path,
                TimeSpec::from_seconds(request.cut_from)
            ))
            .await;

        if !self.fs_port.file_exists(&request.input_path).await? {
            return Err(DomainError::FsFail(format!(
                "Input file does not exist: {}",
                request.input_path
            )));
        }

        let probe = self.probe_port.probe_streams(&request.input_path).await?;
        self.log_port
            .debug(&format!(
                "Probed {} streams, duration: {:?}",
                probe.streams.len(),
                probe.duration
            ))
            .await;

        let video_stream_index =
            self.select_video_stream(&probe.streams, request.video_stream_index)?;

        let decision = self
            .resolver
            .resolve(&request.input_path, request.cut_from, video_stream_index)
            .await?;

        let encode = if decision.segment_needs_smart_cut {
            let codec_params = self
                .deriver
                .derive(&request.input_path, probe.duration, &probe.streams)
                .await?;
            Some(self.encode_plan(&request, codec_params)?)
        } else {
            None
        };

        Ok(SmartCutPlan {
            input_path: request.input_path,
            format_name: probe.format_name,
            desired_cut_from: request.cut_from,
            decision,
            encode,
        })
    }

    /// The requested stream when it is a real video stream, else the first one
    fn select_video_stream(
        &self,
        streams: &[StreamDescriptor],
        requested: Option<usize>,
    ) -> Result<usize, DomainError> {
        let video_streams = self.classifier.real_video_streams(streams);

        match requested {
            Some(index) if video_streams.iter().any(|stream| stream.index == index) => Ok(index),
            Some(index) => Err(DomainError::BadArgs(format!(
                "Stream {} is not a video stream that can be cut on",
                index
            ))),
            None => video_streams
                .first()
                .map(|stream| stream.index)
                .ok_or_else(|| DomainError::BadArgs("Input has no video stream".to_string())),
        }
    }

    fn encode_plan(
        &self,
        request: &SmartCutRequest,
        codec_params: CodecParams,
    ) -> Result<EncodePlan, DomainError> {
        let encoder = request
            .encoder
            .clone()
            .unwrap_or_else(|| codec_params.video_codec.clone());
        let index = request.output_index;

        let quality_args = EncoderQualityMapper::build_quality_arguments_with_policy(
            &encoder,
            index,
            request.quality,
            request.preset.as_deref(),
            self.override_policy,
        )?;

        let mut video_args = vec![
            format!("-c:v:{}", index),
            encoder.clone(),
            format!("-b:v:{}", index),
            codec_params.video_bitrate.to_string(),
        ];
        video_args.extend(quality_args.iter().cloned());
        if let Some(timebase) = codec_params.video_timebase {
            let timescale = (timebase.den as f64 / timebase.num as f64).round() as u64;
            video_args.extend(["-video_track_timescale".to_string(), timescale.to_string()]);
        }

        Ok(EncodePlan {
            family: EncoderFamily::from_encoder(&encoder),
            encoder,
            codec_params,
            quality_args,
            video_args,
        })
    }
}

/// Request for cut planning
#[derive(Debug, Clone)]
pub struct SmartCutRequest {
    pub input_path: String,
    /// Desired start of the cut, in seconds
    pub cut_from: f64,
    /// Video stream to cut on; defaults to the first real video stream
    pub video_stream_index: Option<usize>,
    /// Encoder for the bridging segment; defaults to the derived codec
    pub encoder: Option<String>,
    pub quality: Option<u32>,
    pub preset: Option<String>,
    /// Output stream index the encoder arguments are scoped to
    pub output_index: usize,
}

impl SmartCutRequest {
    pub fn new(input_path: impl Into<String>, cut_from: f64) -> Self {
        Self {
            input_path: input_path.into(),
            cut_from,
            video_stream_index: None,
            encoder: None,
            quality: None,
            preset: None,
            output_index: 0,
        }
    }

    pub fn with_encoder(mut self, encoder: impl Into<String>) -> Self {
        self.encoder = Some(encoder.into());
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }
}

/// How the bridging segment is to be encoded
#[derive(Debug, Clone, Serialize)]
pub struct EncodePlan {
    pub encoder: String,
    pub family: EncoderFamily,
    pub codec_params: CodecParams,
    pub quality_args: Vec<String>,
    /// Complete video arguments for the bridging segment
    pub video_args: Vec<String>,
}

/// Result of cut planning
#[derive(Debug, Clone, Serialize)]
pub struct SmartCutPlan {
    pub input_path: String,
    /// Container format reported by the probe
    pub format_name: Option<String>,
    pub desired_cut_from: f64,
    pub decision: CutDecision,
    /// Present only when a smart cut is needed
    pub encode: Option<EncodePlan>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::*;

    fn interactor(
        keyframes: &[f64],
        streams: Vec<StreamDescriptor>,
        duration: Option<f64>,
    ) -> SmartCutInteractor {
        SmartCutInteractor::new(
            Arc::new(MockProbeAdapter::new(streams, duration)),
            Arc::new(MockKeyframeAdapter::new(keyframes)),
            Arc::new(MockFsAdapter::new().with_file("in.mp4", 25_000_000)),
            Arc::new(RealVideoStreamClassifier),
            Arc::new(RecordingLogAdapter::new()),
        )
    }

    fn h264_stream() -> StreamDescriptor {
        StreamDescriptor::video(0, "h264")
            .with_bit_rate("4000000")
            .with_time_base("1/90000")
    }

    #[tokio::test]
    async fn test_lossless_plan_has_no_encode() {
        let interactor = interactor(&[0.0, 2.0, 4.0], vec![h264_stream()], Some(10.0));

        let plan = interactor.plan(SmartCutRequest::new("in.mp4", 2.0)).await.unwrap();

        assert_eq!(plan.decision, CutDecision::lossless(2.0));
        assert!(plan.encode.is_none());
    }

    #[tokio::test]
    async fn test_smart_cut_plan_with_encoder() {
        let interactor = interactor(&[0.0, 2.0, 4.0], vec![h264_stream()], Some(10.0));

        let plan = interactor
            .plan(SmartCutRequest::new("in.mp4", 2.5).with_encoder("libx264"))
            .await
            .unwrap();

        assert_eq!(plan.decision, CutDecision::smart_cut(4.0));
        let encode = plan.encode.unwrap();
        assert_eq!(encode.family, EncoderFamily::SoftwareH264);
        assert_eq!(encode.codec_params.video_bitrate, 4_800_000);
        assert_eq!(
            encode.video_args,
            vec![
                "-c:v:0",
                "libx264",
                "-b:v:0",
                "4800000",
                "-crf:v:0",
                "23",
                "-preset:v:0",
                "medium",
                "-video_track_timescale",
                "90000",
            ]
        );
    }

    #[tokio::test]
    async fn test_smart_cut_plan_defaults_to_source_codec() {
        let interactor = interactor(&[0.0, 4.0], vec![h264_stream()], Some(10.0));

        let plan = interactor.plan(SmartCutRequest::new("in.mp4", 1.0)).await.unwrap();

        let encode = plan.encode.unwrap();
        assert_eq!(encode.encoder, "h264");
        assert_eq!(encode.family, EncoderFamily::Unrecognized);
        assert!(encode.quality_args.is_empty());
    }

    #[tokio::test]
    async fn test_plan_reports_container_format() {
        let interactor = SmartCutInteractor::new(
            Arc::new(
                MockProbeAdapter::new(vec![h264_stream()], Some(10.0))
                    .with_format_name("matroska,webm"),
            ),
            Arc::new(MockKeyframeAdapter::new(&[0.0, 2.0])),
            Arc::new(MockFsAdapter::new().with_file("in.mp4", 1_000)),
            Arc::new(RealVideoStreamClassifier),
            Arc::new(RecordingLogAdapter::new()),
        );

        let plan = interactor.plan(SmartCutRequest::new("in.mp4", 2.0)).await.unwrap();
        assert_eq!(plan.format_name.as_deref(), Some("matroska,webm"));
    }

    #[tokio::test]
    async fn test_requested_stream_must_be_real_video() {
        let audio = StreamDescriptor {
            index: 1,
            codec_name: Some("aac".to_string()),
            codec_type: StreamType::Audio,
            ..StreamDescriptor::default()
        };
        let cover = StreamDescriptor::video(2, "mjpeg").with_attached_pic();
        let interactor = interactor(
            &[0.0, 2.5, 4.0],
            vec![h264_stream(), audio, cover],
            Some(10.0),
        );

        for index in [1, 2, 7] {
            let mut request = SmartCutRequest::new("in.mp4", 2.5);
            request.video_stream_index = Some(index);
            assert!(matches!(
                interactor.plan(request).await,
                Err(DomainError::BadArgs(_))
            ));
        }

        let mut request = SmartCutRequest::new("in.mp4", 2.5);
        request.video_stream_index = Some(0);
        let plan = interactor.plan(request).await.unwrap();
        assert_eq!(plan.decision, CutDecision::lossless(2.5));
    }

    #[tokio::test]
    async fn test_incompatible_quality_override_rejected() {
        let interactor = interactor(&[0.0, 4.0], vec![h264_stream()], Some(10.0));

        let request = SmartCutRequest::new("in.mp4", 1.0)
            .with_encoder("h264_vaapi")
            .with_quality(20);
        assert!(matches!(
            interactor.plan(request).await,
            Err(DomainError::BadArgs(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let interactor = interactor(&[0.0], vec![h264_stream()], Some(10.0));

        let err = interactor
            .plan(SmartCutRequest::new("other.mp4", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FsFail(_)));
    }

    #[tokio::test]
    async fn test_no_video_stream() {
        let audio = StreamDescriptor {
            index: 0,
            codec_type: StreamType::Audio,
            ..StreamDescriptor::default()
        };
        let interactor = interactor(&[0.0], vec![audio], Some(10.0));

        let err = interactor
            .plan(SmartCutRequest::new("in.mp4", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BadArgs(_)));
    }
}
