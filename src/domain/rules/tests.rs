// Unit tests for business rules

use super::*;
use crate::domain::errors::DomainError;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_software_h264_defaults() {
    let result = EncoderQualityMapper::build_quality_arguments("libx264", 0, None, None).unwrap();
    assert_eq!(result, args(&["-crf:v:0", "23", "-preset:v:0", "medium"]));
}

#[test]
fn test_nvenc_quality_override_keeps_default_preset() {
    let result =
        EncoderQualityMapper::build_quality_arguments("h264_nvenc", 2, Some(18), None).unwrap();
    assert_eq!(result, args(&["-cq:v:2", "18", "-preset:v:2", "p4"]));
}

#[test]
fn test_qsv_uses_global_quality() {
    let result = EncoderQualityMapper::build_quality_arguments("hevc_qsv", 1, None, None).unwrap();
    assert_eq!(
        result,
        args(&["-global_quality:v:1", "28", "-preset:v:1", "medium"])
    );
}

#[test]
fn test_amf_emits_both_quantizers() {
    let result =
        EncoderQualityMapper::build_quality_arguments("av1_amf", 0, Some(26), Some("quality"))
            .unwrap();
    assert_eq!(
        result,
        args(&["-qp_i:v:0", "26", "-qp_p:v:0", "26", "-preset:v:0", "quality"])
    );
}

#[test]
fn test_videotoolbox_gets_fixed_quality_scale() {
    let result =
        EncoderQualityMapper::build_quality_arguments("hevc_videotoolbox", 0, None, None).unwrap();
    assert_eq!(result, args(&["-q:v:0", "65"]));
}

#[test]
fn test_vaapi_contributes_nothing() {
    let result = EncoderQualityMapper::build_quality_arguments("h264_vaapi", 0, None, None).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_quality_override_rejected_without_numeric_dialect() {
    let err = EncoderQualityMapper::build_quality_arguments("h264_videotoolbox", 0, Some(20), None)
        .unwrap_err();
    assert!(matches!(err, DomainError::BadArgs(_)));

    assert!(EncoderQualityMapper::build_quality_arguments("mystery", 0, Some(20), None).is_err());
}

#[test]
fn test_quality_override_pass_through_uses_rate_factor() {
    let result = EncoderQualityMapper::build_quality_arguments_with_policy(
        "h264_videotoolbox",
        1,
        Some(20),
        None,
        QualityOverridePolicy::PassThrough,
    )
    .unwrap();
    assert_eq!(result, args(&["-crf:v:1", "20", "-q:v:1", "65"]));
}

#[test]
fn test_preset_override_on_family_without_preset() {
    let result =
        EncoderQualityMapper::build_quality_arguments("h264_vaapi", 0, None, Some("fast")).unwrap();
    assert_eq!(result, args(&["-preset:v:0", "fast"]));
}

#[test]
fn test_supports_quality_value() {
    assert!(!EncoderQualityMapper::supports_quality_value("vaapi_whatever"));
    assert!(EncoderQualityMapper::supports_quality_value("libx265"));
    assert!(!EncoderQualityMapper::supports_quality_value("h264_videotoolbox"));
    assert!(!EncoderQualityMapper::supports_quality_value("mpeg4"));
}

#[test]
fn test_family_table() {
    let cases = [
        ("libx264", EncoderFamily::SoftwareH264, Some(23), Some("medium")),
        ("libx265", EncoderFamily::SoftwareH265, Some(28), Some("medium")),
        ("libsvtav1", EncoderFamily::SoftwareAv1, Some(35), Some("6")),
        ("h264_nvenc", EncoderFamily::NvencH264, Some(23), Some("p4")),
        ("hevc_nvenc", EncoderFamily::NvencH265, Some(28), Some("p4")),
        ("av1_nvenc", EncoderFamily::NvencAv1, Some(30), Some("p4")),
        ("h264_videotoolbox", EncoderFamily::VideoToolbox, None, None),
        ("h264_qsv", EncoderFamily::QsvH264, Some(23), Some("medium")),
        ("av1_qsv", EncoderFamily::QsvAv1, Some(30), Some("medium")),
        ("hevc_vaapi", EncoderFamily::Vaapi, None, None),
        ("h264_amf", EncoderFamily::AmfH264, Some(23), Some("balanced")),
        ("hevc_amf", EncoderFamily::AmfH265, Some(28), Some("balanced")),
        ("vp9_qsv", EncoderFamily::Unrecognized, None, None),
        ("libvpx-vp9", EncoderFamily::Unrecognized, None, None),
    ];

    for (encoder, family, quality, preset) in cases {
        assert_eq!(EncoderFamily::from_encoder(encoder), family, "{}", encoder);
        assert_eq!(EncoderQualityMapper::optimal_quality(encoder), quality, "{}", encoder);
        assert_eq!(EncoderQualityMapper::optimal_preset(encoder), preset, "{}", encoder);
    }
}

#[test]
fn test_quality_override_policy_parse() {
    assert_eq!(
        QualityOverridePolicy::parse("Reject").unwrap(),
        QualityOverridePolicy::Reject
    );
    assert_eq!(
        QualityOverridePolicy::parse("pass-through").unwrap(),
        QualityOverridePolicy::PassThrough
    );
    assert!(QualityOverridePolicy::parse("maybe").is_err());
}

#[test]
fn test_decide_cut_exact_keyframe_is_lossless() {
    let keyframes = [Keyframe::at(0.0), Keyframe::at(2.0), Keyframe::at(4.0)];
    assert_eq!(decide_cut(&keyframes, 2.0), Some(CutDecision::lossless(2.0)));
}

#[test]
fn test_decide_cut_picks_smallest_following_keyframe() {
    let keyframes = [Keyframe::at(0.0), Keyframe::at(4.0), Keyframe::at(8.0)];
    assert_eq!(decide_cut(&keyframes, 2.5), Some(CutDecision::smart_cut(4.0)));
}

#[test]
fn test_decide_cut_nothing_after_desired() {
    let keyframes = [Keyframe::at(0.0), Keyframe::at(4.0)];
    assert_eq!(decide_cut(&keyframes, 5.0), None);
    assert_eq!(decide_cut(&[], 5.0), None);
}

#[test]
fn test_real_video_stream_classifier() {
    let streams = vec![
        StreamDescriptor::video(0, "h264"),
        StreamDescriptor {
            index: 1,
            codec_type: StreamType::Audio,
            ..StreamDescriptor::default()
        },
        StreamDescriptor::video(2, "mjpeg").with_attached_pic(),
    ];

    let real = RealVideoStreamClassifier.real_video_streams(&streams);
    assert_eq!(real.len(), 1);
    assert_eq!(real[0].index, 0);
}

#[test]
fn test_bitrate_estimator() {
    assert_eq!(BitrateEstimator::parse_reported(Some("4500000")), Some(4_500_000));
    assert_eq!(BitrateEstimator::parse_reported(Some("N/A")), None);
    assert_eq!(BitrateEstimator::parse_reported(None), None);

    assert_eq!(
        BitrateEstimator::estimate_from_size(12_500_000, Some(100.0)),
        Some(1_000_000.0)
    );
    assert_eq!(BitrateEstimator::estimate_from_size(12_500_000, None), None);
    assert_eq!(BitrateEstimator::estimate_from_size(12_500_000, Some(0.0)), None);

    assert_eq!(BitrateEstimator::with_safety_margin(1_000_000.0), 1_200_000);
    assert_eq!(BitrateEstimator::with_safety_margin(999.0), 1198);
}

#[test]
fn test_target_encoder_for_codec() {
    assert_eq!(target_encoder_for_codec("av1"), "libsvtav1");
    assert_eq!(target_encoder_for_codec("h264"), "h264");
    assert_eq!(target_encoder_for_codec("hevc"), "hevc");
}
