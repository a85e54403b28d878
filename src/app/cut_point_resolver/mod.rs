// Cut point resolver - Lossless vs. smart cut decision for a trim start

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;

/// Decides whether a cut can start with stream copy or needs a re-encoded bridge
pub struct CutPointResolver {
    keyframe_port: Arc<dyn KeyframePort>,
    log_port: Arc<dyn LogPort>,
}

impl CutPointResolver {
    /// Create new resolver with injected ports
    pub fn new(keyframe_port: Arc<dyn KeyframePort>, log_port: Arc<dyn LogPort>) -> Self {
        Self {
            keyframe_port,
            log_port,
        }
    }

    /// Resolve the cut boundary for `desired_cut_from` on `video_stream_index`.
    ///
    /// Searches ±10s first and, if no keyframe at or after the desired point is
    /// found, once more with ±60s. Fails with [`DomainError::UserFacing`] when
    /// neither window has one.
    pub async fn resolve(
        &self,
        file_path: &str,
        desired_cut_from: f64,
        video_stream_index: usize,
    ) -> Result<CutDecision, DomainError> {
        if !desired_cut_from.is_finite() {
            return Err(DomainError::BadArgs(format!(
                "Cut point must be a finite time, got {}",
                desired_cut_from
            )));
        }

        let keyframes = self
            .keyframe_port
            .query_keyframes(
                file_path,
                video_stream_index,
                desired_cut_from,
                KEYFRAME_SEARCH_WINDOW,
            )
            .await?;
        if let Some(decision) = decide_cut(&keyframes, desired_cut_from) {
            self.report(&decision, desired_cut_from).await;
            return Ok(decision);
        }

        self.log_port
            .warn(&format!(
                "No keyframe at or after {:.3}s within ±{}s, widening search to ±{}s",
                desired_cut_from, KEYFRAME_SEARCH_WINDOW, WIDENED_KEYFRAME_SEARCH_WINDOW
            ))
            .await;

        let keyframes = self
            .keyframe_port
            .query_keyframes(
                file_path,
                video_stream_index,
                desired_cut_from,
                WIDENED_KEYFRAME_SEARCH_WINDOW,
            )
            .await?;
        match decide_cut(&keyframes, desired_cut_from) {
            Some(decision) => {
                self.report(&decision, desired_cut_from).await;
                Ok(decision)
            }
            None => Err(DomainError::UserFacing(format!(
                "No keyframe exists at or after the desired cut point ({}). Please choose a different cut point.",
                TimeSpec::from_seconds(desired_cut_from.max(0.0))
            ))),
        }
    }

    async fn report(&self, decision: &CutDecision, desired_cut_from: f64) {
        if decision.segment_needs_smart_cut {
            self.log_port
                .info(&format!(
                    "Smart cut needed: re-encode {:.3}s to {:.3}s, stream copy from {:.3}s",
                    desired_cut_from, decision.lossless_cut_from, decision.lossless_cut_from
                ))
                .await;
        } else {
            self.log_port
                .info(&format!(
                    "Keyframe found exactly at {:.3}s, lossless cut possible",
                    desired_cut_from
                ))
                .await;
        }
    }
}
