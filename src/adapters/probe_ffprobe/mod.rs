//! FFprobe adapter for media file probing
//!
//! Runs the `ffprobe` executable and parses its JSON output. Implements both
//! stream probing and keyframe lookup; keyframes come from packet flags read over
//! a bounded interval, so only the searched window is demuxed.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    ffprobe_path: PathBuf,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe_path: &str) -> Result<Self, DomainError> {
        if ffprobe_path.trim().is_empty() {
            return Err(DomainError::BadArgs(
                "ffprobe path cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            ffprobe_path: PathBuf::from(ffprobe_path),
        })
    }

    /// Run ffprobe and return its stdout. The child is killed if the future is dropped.
    async fn run(&self, args: &[String]) -> Result<Vec<u8>, DomainError> {
        debug!("Running {} {}", self.ffprobe_path.display(), args.join(" "));

        let output = Command::new(&self.ffprobe_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFail(format!(
                    "Failed to run {}: {}",
                    self.ffprobe_path.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_streams(&self, file_path: &str) -> Result<ProbeReport, DomainError> {
        let args: Vec<String> = [
            "-v",
            "error",
            "-show_streams",
            "-show_format",
            "-of",
            "json",
            file_path,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let stdout = self.run(&args).await?;
        parse_probe_report(&stdout)
    }
}

#[async_trait]
impl KeyframePort for FFprobeAdapter {
    async fn query_keyframes(
        &self,
        file_path: &str,
        stream_index: usize,
        around: f64,
        window: f64,
    ) -> Result<Vec<Keyframe>, DomainError> {
        let from = (around - window).max(0.0);
        let to = around + window;
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            stream_index.to_string(),
            "-show_packets".to_string(),
            "-show_entries".to_string(),
            "packet=pts_time,flags".to_string(),
            "-read_intervals".to_string(),
            format!("{:.6}%{:.6}", from, to),
            "-of".to_string(),
            "json".to_string(),
            file_path.to_string(),
        ];

        let stdout = self.run(&args).await?;
        let keyframes = parse_keyframe_packets(&stdout)?;
        debug!(
            "Found {} keyframes in {:.3}s - {:.3}s of stream {}",
            keyframes.len(),
            from,
            to,
            stream_index
        );
        Ok(keyframes)
    }
}

#[derive(Debug, Deserialize)]
struct PacketsOutput {
    #[serde(default)]
    packets: Vec<PacketEntry>,
}

#[derive(Debug, Deserialize)]
struct PacketEntry {
    pts_time: Option<String>,
    flags: Option<String>,
}

/// Keyframe times from `-show_packets` JSON, ascending and deduplicated
pub fn parse_keyframe_packets(json: &[u8]) -> Result<Vec<Keyframe>, DomainError> {
    let output: PacketsOutput = serde_json::from_slice(json)
        .map_err(|e| DomainError::ProbeFail(format!("Invalid ffprobe packet output: {}", e)))?;

    let mut times: Vec<f64> = output
        .packets
        .into_iter()
        .filter(|packet| {
            packet
                .flags
                .as_deref()
                .map_or(false, |flags| flags.starts_with('K'))
        })
        .filter_map(|packet| packet.pts_time?.parse::<f64>().ok())
        .filter(|time| time.is_finite())
        .collect();

    times.sort_by(|a, b| a.total_cmp(b));
    times.dedup();
    Ok(times.into_iter().map(Keyframe::at).collect())
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<StreamDescriptor>,
    format: Option<FormatEntry>,
}

#[derive(Debug, Deserialize)]
struct FormatEntry {
    duration: Option<String>,
    format_name: Option<String>,
}

/// Streams and container duration from `-show_streams -show_format` JSON
pub fn parse_probe_report(json: &[u8]) -> Result<ProbeReport, DomainError> {
    let output: ProbeOutput = serde_json::from_slice(json)
        .map_err(|e| DomainError::ProbeFail(format!("Invalid ffprobe stream output: {}", e)))?;

    let (duration, format_name) = match output.format {
        Some(format) => (
            format
                .duration
                .and_then(|d| d.trim().parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d > 0.0),
            format.format_name,
        ),
        None => (None, None),
    };

    Ok(ProbeReport {
        streams: output.streams,
        duration,
        format_name,
    })
}
