use std::fmt;

/// Subsystem a local log line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    Core,
    Analytics,
    Diagnostics,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogTag::Core => "CORE",
            LogTag::Analytics => "ANALYTICS",
            LogTag::Diagnostics => "DIAGNOSTICS",
        }
    }
}

impl fmt::Display for LogTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local structured logger the gate writes its own traces to.
pub trait Logger: Send + Sync {
    fn debug(&self, tag: LogTag, msg: &str);
    fn info(&self, tag: LogTag, msg: &str);
    fn error(&self, msg: &str, err: &(dyn std::error::Error + 'static));
}

/// Logger backed by the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, tag: LogTag, msg: &str) {
        tracing::debug!(tag = %tag, "{}", msg);
    }

    fn info(&self, tag: LogTag, msg: &str) {
        tracing::info!(tag = %tag, "{}", msg);
    }

    fn error(&self, msg: &str, err: &(dyn std::error::Error + 'static)) {
        tracing::error!(error = %err, "{}", msg);
    }
}
