//! Backend seams. The gate only ever talks to these two traits; concrete
//! analytics and crash-reporting SDKs live behind them.

pub mod http;
pub mod local;
pub mod memory;

use crate::gate::error::SinkError;
use crate::gate::event::{EventPayload, ExceptionReport};

pub use http::HttpAnalyticsSink;
pub use local::{LocalAnalyticsSink, LocalDiagnosticsSink};
pub use memory::{RecordingAnalyticsSink, RecordingDiagnosticsSink};

/// Analytics backend. Implementations synchronize internally.
pub trait AnalyticsSink: Send + Sync {
    fn set_collection_enabled(&self, enabled: bool) -> Result<(), SinkError>;
    fn log_event(&self, name: &str, payload: &EventPayload) -> Result<(), SinkError>;
}

/// Diagnostics / crash-reporting backend.
pub trait DiagnosticsSink: Send + Sync {
    fn set_collection_enabled(&self, enabled: bool) -> Result<(), SinkError>;
    fn log(&self, message: &str) -> Result<(), SinkError>;
    fn record_exception(&self, report: &ExceptionReport) -> Result<(), SinkError>;
}
