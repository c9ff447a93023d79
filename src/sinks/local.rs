use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info};

use super::{AnalyticsSink, DiagnosticsSink};
use crate::gate::error::SinkError;
use crate::gate::event::{EventPayload, ExceptionReport};

/// Local backend: accepted analytics become structured `tracing` events
/// under the `telemetry` target. Nothing leaves the machine.
#[derive(Debug)]
pub struct LocalAnalyticsSink {
    collecting: AtomicBool,
}

impl LocalAnalyticsSink {
    pub fn new() -> Self {
        Self {
            collecting: AtomicBool::new(true),
        }
    }
}

impl Default for LocalAnalyticsSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsSink for LocalAnalyticsSink {
    fn set_collection_enabled(&self, enabled: bool) -> Result<(), SinkError> {
        self.collecting.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn log_event(&self, name: &str, payload: &EventPayload) -> Result<(), SinkError> {
        if self.collecting.load(Ordering::SeqCst) {
            info!(target: "telemetry", event = name, payload = %payload, "analytics event");
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct LocalDiagnosticsSink {
    collecting: AtomicBool,
}

impl LocalDiagnosticsSink {
    pub fn new() -> Self {
        Self {
            collecting: AtomicBool::new(true),
        }
    }
}

impl Default for LocalDiagnosticsSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsSink for LocalDiagnosticsSink {
    fn set_collection_enabled(&self, enabled: bool) -> Result<(), SinkError> {
        self.collecting.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn log(&self, message: &str) -> Result<(), SinkError> {
        if self.collecting.load(Ordering::SeqCst) {
            info!(target: "telemetry", breadcrumb = message, "diagnostic breadcrumb");
        }
        Ok(())
    }

    fn record_exception(&self, report: &ExceptionReport) -> Result<(), SinkError> {
        if self.collecting.load(Ordering::SeqCst) {
            error!(
                target: "telemetry",
                causes = report.causes.len(),
                has_backtrace = report.backtrace.is_some(),
                "recorded exception: {}",
                report
            );
        }
        Ok(())
    }
}
