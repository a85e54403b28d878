//! In-memory adapters
//!
//! Used by tests and by callers that already hold probe/keyframe data and only
//! want the planning logic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Keyframe source backed by a fixed list of keyframe times
pub struct MockKeyframeAdapter {
    keyframes: Vec<Keyframe>,
    failure: Option<DomainError>,
    queried_windows: Mutex<Vec<f64>>,
}

impl MockKeyframeAdapter {
    pub fn new(times: &[f64]) -> Self {
        let mut keyframes: Vec<Keyframe> = times.iter().copied().map(Keyframe::at).collect();
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            keyframes,
            failure: None,
            queried_windows: Mutex::new(Vec::new()),
        }
    }

    /// Every query fails with `error`
    pub fn failing(error: DomainError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(&[])
        }
    }

    /// Window sizes requested so far, in call order
    pub fn queried_windows(&self) -> Vec<f64> {
        self.queried_windows
            .lock()
            .map(|windows| windows.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl KeyframePort for MockKeyframeAdapter {
    async fn query_keyframes(
        &self,
        _file_path: &str,
        _stream_index: usize,
        around: f64,
        window: f64,
    ) -> Result<Vec<Keyframe>, DomainError> {
        match self.queried_windows.lock() {
            Ok(mut windows) => windows.push(window),
            Err(poisoned) => poisoned.into_inner().push(window),
        }

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let (from, to) = (around - window, around + window);
        Ok(self
            .keyframes
            .iter()
            .copied()
            .filter(|kf| kf.time >= from && kf.time <= to)
            .collect())
    }
}

/// File system with sizes registered up front
#[derive(Default)]
pub struct MockFsAdapter {
    sizes: HashMap<String, u64>,
}

impl MockFsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, size: u64) -> Self {
        self.sizes.insert(path.to_string(), size);
        self
    }
}

#[async_trait]
impl FsPort for MockFsAdapter {
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
        Ok(self.sizes.contains_key(file_path))
    }

    async fn file_size(&self, file_path: &str) -> Result<u64, DomainError> {
        self.sizes
            .get(file_path)
            .copied()
            .ok_or_else(|| DomainError::FsFail(format!("No such file: {}", file_path)))
    }
}

/// Probe returning a canned report
pub struct MockProbeAdapter {
    report: ProbeReport,
}

impl MockProbeAdapter {
    pub fn new(streams: Vec<StreamDescriptor>, duration: Option<f64>) -> Self {
        Self {
            report: ProbeReport {
                streams,
                duration,
                format_name: None,
            },
        }
    }

    pub fn with_format_name(mut self, format_name: &str) -> Self {
        self.report.format_name = Some(format_name.to_string());
        self
    }
}

#[async_trait]
impl ProbePort for MockProbeAdapter {
    async fn probe_streams(&self, _file_path: &str) -> Result<ProbeReport, DomainError> {
        Ok(self.report.clone())
    }
}

/// Log sink that keeps every message
#[derive(Default)]
pub struct RecordingLogAdapter {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, level: LogLevel, message: &str) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push((level, message.to_string())),
            Err(poisoned) => poisoned.into_inner().push((level, message.to_string())),
        }
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Messages logged at `level`
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(entry_level, _)| *entry_level == level)
            .map(|(_, message)| message)
            .collect()
    }
}

#[async_trait]
impl LogPort for RecordingLogAdapter {
    async fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    async fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }

    async fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message);
    }
}
