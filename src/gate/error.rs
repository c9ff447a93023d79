use thiserror::Error;

/// Failure reported by an analytics or diagnostics backend.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The backend was never initialized (no client, no runtime, ...).
    #[error("telemetry backend not initialized: {0}")]
    NotInitialized(String),

    /// The backend exists but its collection state is unusable.
    #[error("telemetry backend in invalid state: {0}")]
    InvalidState(String),

    /// The backend refused the call.
    #[error("telemetry backend rejected call: {0}")]
    Rejected(String),

    #[error("telemetry transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorKind {
    NotInitialized,
    InvalidState,
    Rejected,
    Transport,
}

impl SinkError {
    pub fn kind(&self) -> SinkErrorKind {
        match self {
            SinkError::NotInitialized(_) => SinkErrorKind::NotInitialized,
            SinkError::InvalidState(_) => SinkErrorKind::InvalidState,
            SinkError::Rejected(_) => SinkErrorKind::Rejected,
            SinkError::Transport(_) => SinkErrorKind::Transport,
        }
    }

    /// True for the "backend not ready" class that gated paths absorb.
    pub fn is_backend_unavailable(&self) -> bool {
        self.kind().is_backend_unavailable()
    }
}

impl SinkErrorKind {
    pub fn is_backend_unavailable(self) -> bool {
        matches!(self, SinkErrorKind::NotInitialized | SinkErrorKind::InvalidState)
    }

    /// Builds an error of this kind. Used by test doubles and adapters.
    pub fn into_error(self, detail: impl Into<String>) -> SinkError {
        let detail = detail.into();
        match self {
            SinkErrorKind::NotInitialized => SinkError::NotInitialized(detail),
            SinkErrorKind::InvalidState => SinkError::InvalidState(detail),
            SinkErrorKind::Rejected => SinkError::Rejected(detail),
            SinkErrorKind::Transport => SinkError::Transport(detail),
        }
    }
}

/// Error surfaced by a gated dispatcher operation.
///
/// Backend-unavailable failures never show up here; they are traced and
/// absorbed. Anything else is a genuine defect and is handed back.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Sink(#[from] SinkError),
}
