use std::sync::Arc;

use super::consent::ConsentGate;
use super::error::{DispatchError, SinkError};
use super::event::{EventName, EventPayload, ExceptionReport, DEFAULT_EVENT_NAME};
use crate::config::GateConfig;
use crate::services::logger::{LogTag, Logger};
use crate::services::settings::SettingsStore;
use crate::sinks::{AnalyticsSink, DiagnosticsSink};

/// Single entry point for all outgoing telemetry.
///
/// Analytics events are gated on consent, evaluated fresh per call.
/// Diagnostic messages and exceptions are NOT gated: crash context is
/// always forwarded, and their sink failures reach the caller.
pub struct TelemetryDispatcher {
    logger: Arc<dyn Logger>,
    gate: ConsentGate,
    analytics: Arc<dyn AnalyticsSink>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl TelemetryDispatcher {
    /// Builds the dispatcher and configures both sinks' collection flag
    /// from the consent state at this moment. The flag is not re-derived
    /// later; see [`reconfigure_collection`](Self::reconfigure_collection).
    pub fn new(
        config: &GateConfig,
        logger: Arc<dyn Logger>,
        settings: Arc<dyn SettingsStore>,
        analytics: Arc<dyn AnalyticsSink>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        let dispatcher = Self {
            gate: ConsentGate::new(config.process_override, settings, logger.clone()),
            logger,
            analytics,
            diagnostics,
        };
        dispatcher.configure_collection();
        dispatcher
    }

    pub fn is_enabled(&self) -> bool {
        self.gate.is_enabled()
    }

    /// Re-applies the live consent state to both sinks. Returns the state
    /// that was applied.
    pub fn reconfigure_collection(&self) -> bool {
        self.configure_collection()
    }

    pub fn log_named_event(&self, name: &str, payload: &EventPayload) -> Result<(), DispatchError> {
        self.dispatch_event(name, payload)
    }

    /// Logs under [`DEFAULT_EVENT_NAME`].
    pub fn log_default_event(&self, payload: &EventPayload) -> Result<(), DispatchError> {
        self.dispatch_event(DEFAULT_EVENT_NAME, payload)
    }

    pub fn log_bare_event(&self, name: &str) -> Result<(), DispatchError> {
        self.dispatch_event(name, &EventPayload::empty())
    }

    pub fn log_diagnostic_message(&self, message: &str) -> Result<(), SinkError> {
        self.logger
            .info(LogTag::Core, &format!("Crash log message: {}", message));
        self.diagnostics.log(message)
    }

    pub fn log_exception(&self, err: &(dyn std::error::Error + 'static)) -> Result<(), SinkError> {
        self.logger.error("Crash log exception: ", err);
        self.diagnostics
            .record_exception(&ExceptionReport::from_error(err))
    }

    /// Like [`log_exception`](Self::log_exception), but keeps the backtrace
    /// anyhow captured.
    pub fn log_anyhow(&self, err: &anyhow::Error) -> Result<(), SinkError> {
        self.log_exception_report(&ExceptionReport::from_anyhow(err))
    }

    /// Forwards a report built elsewhere, e.g. from a panic hook.
    pub fn log_exception_report(&self, report: &ExceptionReport) -> Result<(), SinkError> {
        self.logger.error("Crash log exception: ", report);
        self.diagnostics.record_exception(report)
    }

    fn dispatch_event(&self, name: &str, payload: &EventPayload) -> Result<(), DispatchError> {
        let Some(name) = EventName::parse(name) else {
            self.logger.debug(
                LogTag::Core,
                &format!("Ignoring event without a name: {}", payload),
            );
            return Ok(());
        };

        if !self.gate.is_enabled() {
            self.logger.debug(
                LogTag::Core,
                &format!("Ignoring recently opted-out event {}: {}", name, payload),
            );
            return Ok(());
        }

        match self.analytics.log_event(name.as_str(), payload) {
            Ok(()) => Ok(()),
            Err(e) if e.is_backend_unavailable() => {
                self.logger.debug(
                    LogTag::Core,
                    &format!("Ignoring non-initialized event {}: {} ({})", name, payload, e),
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn configure_collection(&self) -> bool {
        let enabled = self.gate.is_enabled();
        if let Err(e) = self.analytics.set_collection_enabled(enabled) {
            self.report_configure_failure(LogTag::Analytics, &e);
        }
        if let Err(e) = self.diagnostics.set_collection_enabled(enabled) {
            self.report_configure_failure(LogTag::Diagnostics, &e);
        }
        enabled
    }

    fn report_configure_failure(&self, tag: LogTag, err: &SinkError) {
        if err.is_backend_unavailable() {
            self.logger
                .debug(tag, &format!("Collection not configured: {}", err));
        } else {
            self.logger
                .error(&format!("Collection not configured ({})", tag), err);
        }
    }
}
