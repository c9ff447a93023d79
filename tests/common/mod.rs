#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use telemetry_gate::gate::consent::{ProcessOverride, TELEMETRY_ENABLED_KEY};
use telemetry_gate::gate::SinkErrorKind;
use telemetry_gate::services::{InMemorySettings, LogTag, Logger, SettingsError, SettingsStore};
use telemetry_gate::sinks::{RecordingAnalyticsSink, RecordingDiagnosticsSink};
use telemetry_gate::{GateConfig, TelemetryDispatcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    Debug(LogTag, String),
    Info(LogTag, String),
    Error(String, String),
}

/// Logger double that keeps every line.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<LogLine>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }

    pub fn debug_lines(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| match l {
                LogLine::Debug(_, msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, tag: LogTag, msg: &str) {
        self.lines.lock().unwrap().push(LogLine::Debug(tag, msg.to_string()));
    }

    fn info(&self, tag: LogTag, msg: &str) {
        self.lines.lock().unwrap().push(LogLine::Info(tag, msg.to_string()));
    }

    fn error(&self, msg: &str, err: &(dyn std::error::Error + 'static)) {
        self.lines
            .lock()
            .unwrap()
            .push(LogLine::Error(msg.to_string(), err.to_string()));
    }
}

/// Settings store whose every read fails.
pub struct BrokenSettings;

impl SettingsStore for BrokenSettings {
    fn get_boolean(&self, _key: &str, _default: bool) -> Result<bool, SettingsError> {
        Err(SettingsError::Parse("corrupt preferences".to_string()))
    }
}

pub struct Harness {
    pub logger: Arc<RecordingLogger>,
    pub settings: Arc<InMemorySettings>,
    pub analytics: Arc<RecordingAnalyticsSink>,
    pub diagnostics: Arc<RecordingDiagnosticsSink>,
    pub dispatcher: TelemetryDispatcher,
}

impl Harness {
    pub fn new(process_override: ProcessOverride, preference: Option<bool>) -> Self {
        Self::with_sinks(
            process_override,
            preference,
            RecordingAnalyticsSink::new(),
            RecordingDiagnosticsSink::new(),
        )
    }

    /// Healthy at construction; the analytics sink starts failing afterwards.
    pub fn with_failing_analytics(
        process_override: ProcessOverride,
        preference: Option<bool>,
        kind: SinkErrorKind,
    ) -> Self {
        let h = Self::new(process_override, preference);
        h.analytics.fail_with(Some(kind));
        h
    }

    pub fn with_sinks(
        process_override: ProcessOverride,
        preference: Option<bool>,
        analytics: RecordingAnalyticsSink,
        diagnostics: RecordingDiagnosticsSink,
    ) -> Self {
        let logger = Arc::new(RecordingLogger::default());
        let settings = Arc::new(InMemorySettings::new());
        if let Some(enabled) = preference {
            settings.set_boolean(TELEMETRY_ENABLED_KEY, enabled).unwrap();
        }
        let analytics = Arc::new(analytics);
        let diagnostics = Arc::new(diagnostics);

        let config = GateConfig {
            process_override,
            ..GateConfig::default()
        };
        let dispatcher = TelemetryDispatcher::new(
            &config,
            logger.clone(),
            settings.clone(),
            analytics.clone(),
            diagnostics.clone(),
        );

        Self {
            logger,
            settings,
            analytics,
            diagnostics,
            dispatcher,
        }
    }

    pub fn set_preference(&self, enabled: bool) {
        self.settings
            .set_boolean(TELEMETRY_ENABLED_KEY, enabled)
            .unwrap();
    }
}
