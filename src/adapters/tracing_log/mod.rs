// Tracing log adapter - Structured logging using tracing crate

use crate::ports::*;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Diagnostic sink forwarding to `tracing`; subscriber setup lives in [`crate::utils::logging`]
#[derive(Debug, Default)]
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Create new tracing log adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        info!(target: "smartcut", "{}", message);
    }

    async fn warn(&self, message: &str) {
        warn!(target: "smartcut", "{}", message);
    }

    async fn debug(&self, message: &str) {
        debug!(target: "smartcut", "{}", message);
    }
}
