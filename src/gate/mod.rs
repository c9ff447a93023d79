//! The privacy gate.
//!
//! # PRIVACY INVARIANT
//! No analytics event reaches a sink unless consent is granted at the moment
//! of the call. Consent is never cached.
//!
//! # CONTAINMENT INVARIANT
//! A backend that is not initialized, or is in an invalid state, never breaks
//! the caller of a gated operation.

pub mod consent;
pub mod dispatcher;
pub mod error;
pub mod event;

pub use consent::{ConsentGate, ProcessOverride};
pub use dispatcher::TelemetryDispatcher;
pub use error::{DispatchError, SinkError, SinkErrorKind};
pub use event::{EventPayload, ExceptionReport, PayloadValue, DEFAULT_EVENT_NAME};
