// Probe LibAV adapter - In-process keyframe scanning using libav

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Keyframe source that demuxes the file in-process instead of spawning ffprobe
pub struct LibavKeyframeAdapter;

impl LibavKeyframeAdapter {
    /// Create new LibAV keyframe adapter
    pub fn new() -> Result<Self, DomainError> {
        ffmpeg::init()
            .map_err(|e| DomainError::ProbeFail(format!("FFmpeg initialization failed: {}", e)))?;
        Ok(Self)
    }

    fn scan(
        input_path: &str,
        stream_index: usize,
        from: f64,
        to: f64,
    ) -> Result<Vec<Keyframe>, DomainError> {
        let mut ictx = ffmpeg::format::input(input_path)
            .map_err(|e| DomainError::ProbeFail(format!("Failed to open input file: {}", e)))?;

        let time_base = {
            let stream = ictx.stream(stream_index).ok_or_else(|| {
                DomainError::ProbeFail(format!("Stream {} not found", stream_index))
            })?;
            if stream.parameters().medium() != ffmpeg::media::Type::Video {
                return Err(DomainError::ProbeFail(format!(
                    "Stream {} is not a video stream",
                    stream_index
                )));
            }
            let rational = stream.time_base();
            Timebase::new(rational.numerator(), rational.denominator()).map_err(|_| {
                DomainError::ProbeFail(format!(
                    "Stream {} has an invalid time base {}/{}",
                    stream_index,
                    rational.numerator(),
                    rational.denominator()
                ))
            })?
        };

        // Land on the keyframe at or before the window start
        let seek_target = (from * ffmpeg::ffi::AV_TIME_BASE as f64) as i64;
        if seek_target > 0 {
            ictx.seek(seek_target, ..=seek_target)
                .map_err(|e| DomainError::ProbeFail(format!("Failed to seek: {}", e)))?;
        }

        let mut keyframes = Vec::new();
        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index || !packet.is_key() {
                continue;
            }
            let Some(pts) = packet.pts() else {
                continue;
            };

            let time = time_base.pts_to_seconds(pts);
            if time > to {
                break;
            }
            if time >= from {
                keyframes.push(Keyframe::at(time));
            }
        }

        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(keyframes)
    }
}

#[async_trait]
impl KeyframePort for LibavKeyframeAdapter {
    async fn query_keyframes(
        &self,
        file_path: &str,
        stream_index: usize,
        around: f64,
        window: f64,
    ) -> Result<Vec<Keyframe>, DomainError> {
        let path = file_path.to_string();
        let from = (around - window).max(0.0);
        let to = around + window;

        let keyframes = tokio::task::spawn_blocking(move || Self::scan(&path, stream_index, from, to))
            .await
            .map_err(|e| DomainError::ProbeFail(format!("Keyframe scan aborted: {}", e)))??;

        debug!(
            "libav found {} keyframes in {:.3}s - {:.3}s of stream {}",
            keyframes.len(),
            from,
            to,
            stream_index
        );
        Ok(keyframes)
    }
}
