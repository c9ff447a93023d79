use std::sync::{Mutex, MutexGuard};

use super::{AnalyticsSink, DiagnosticsSink};
use crate::gate::error::{SinkError, SinkErrorKind};
use crate::gate::event::{EventPayload, ExceptionReport};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub payload: EventPayload,
}

#[derive(Debug, Default)]
struct AnalyticsLog {
    events: Vec<RecordedEvent>,
    collection_calls: Vec<bool>,
    fail_with: Option<SinkErrorKind>,
}

/// Analytics sink that keeps every accepted call in memory.
///
/// Can be armed with [`fail_with`](Self::fail_with) to emulate a broken
/// backend; while armed, every call records nothing and returns that error.
#[derive(Debug, Default)]
pub struct RecordingAnalyticsSink {
    inner: Mutex<AnalyticsLog>,
}

impl RecordingAnalyticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(kind: SinkErrorKind) -> Self {
        let sink = Self::default();
        sink.fail_with(Some(kind));
        sink
    }

    pub fn fail_with(&self, kind: Option<SinkErrorKind>) {
        self.lock().fail_with = kind;
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.lock().events.clone()
    }

    /// Every `set_collection_enabled` value received, in order.
    pub fn collection_calls(&self) -> Vec<bool> {
        self.lock().collection_calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, AnalyticsLog> {
        // A panicking test thread must not hide later assertions.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AnalyticsSink for RecordingAnalyticsSink {
    fn set_collection_enabled(&self, enabled: bool) -> Result<(), SinkError> {
        let mut log = self.lock();
        if let Some(kind) = log.fail_with {
            return Err(kind.into_error("collection flag refused"));
        }
        log.collection_calls.push(enabled);
        Ok(())
    }

    fn log_event(&self, name: &str, payload: &EventPayload) -> Result<(), SinkError> {
        let mut log = self.lock();
        if let Some(kind) = log.fail_with {
            return Err(kind.into_error(format!("event '{}' refused", name)));
        }
        log.events.push(RecordedEvent {
            name: name.to_string(),
            payload: payload.clone(),
        });
        Ok(())
    }
}

#[derive(Debug, Default)]
struct DiagnosticsLog {
    messages: Vec<String>,
    exceptions: Vec<ExceptionReport>,
    collection_calls: Vec<bool>,
    fail_with: Option<SinkErrorKind>,
}

/// Diagnostics sink counterpart of [`RecordingAnalyticsSink`].
#[derive(Debug, Default)]
pub struct RecordingDiagnosticsSink {
    inner: Mutex<DiagnosticsLog>,
}

impl RecordingDiagnosticsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(kind: SinkErrorKind) -> Self {
        let sink = Self::default();
        sink.fail_with(Some(kind));
        sink
    }

    pub fn fail_with(&self, kind: Option<SinkErrorKind>) {
        self.lock().fail_with = kind;
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock().messages.clone()
    }

    pub fn exceptions(&self) -> Vec<ExceptionReport> {
        self.lock().exceptions.clone()
    }

    pub fn collection_calls(&self) -> Vec<bool> {
        self.lock().collection_calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, DiagnosticsLog> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticsSink for RecordingDiagnosticsSink {
    fn set_collection_enabled(&self, enabled: bool) -> Result<(), SinkError> {
        let mut log = self.lock();
        if let Some(kind) = log.fail_with {
            return Err(kind.into_error("collection flag refused"));
        }
        log.collection_calls.push(enabled);
        Ok(())
    }

    fn log(&self, message: &str) -> Result<(), SinkError> {
        let mut log = self.lock();
        if let Some(kind) = log.fail_with {
            return Err(kind.into_error("diagnostic message refused"));
        }
        log.messages.push(message.to_string());
        Ok(())
    }

    fn record_exception(&self, report: &ExceptionReport) -> Result<(), SinkError> {
        let mut log = self.lock();
        if let Some(kind) = log.fail_with {
            return Err(kind.into_error("exception report refused"));
        }
        log.exceptions.push(report.clone());
        Ok(())
    }
}
