use std::sync::Arc;

use crate::services::logger::Logger;
use crate::services::settings::SettingsStore;

/// Settings key holding the user's telemetry opt-in flag.
pub const TELEMETRY_ENABLED_KEY: &str = "telemetry_enabled";

/// Value assumed when the user never touched the preference, or when it
/// cannot be read.
pub const TELEMETRY_ENABLED_DEFAULT: bool = true;

/// Launch-time switch that force-disables telemetry for the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessOverride {
    #[default]
    Unset,
    DisableTelemetry,
}

impl ProcessOverride {
    /// Only a case-insensitive `"true"` disables; any other value (or none)
    /// leaves telemetry allowed.
    pub fn from_flag(raw: Option<&str>) -> Self {
        match raw {
            Some(v) if v.trim().eq_ignore_ascii_case("true") => ProcessOverride::DisableTelemetry,
            _ => ProcessOverride::Unset,
        }
    }

    pub fn allows_telemetry(self) -> bool {
        self == ProcessOverride::Unset
    }
}

/// Live consent decision: the startup override AND the user's preference.
///
/// Nothing is cached. Every call re-reads the settings store so an opt-out
/// takes effect on the very next event.
#[derive(Clone)]
pub struct ConsentGate {
    process_override: ProcessOverride,
    settings: Arc<dyn SettingsStore>,
    logger: Arc<dyn Logger>,
}

impl ConsentGate {
    pub fn new(
        process_override: ProcessOverride,
        settings: Arc<dyn SettingsStore>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            process_override,
            settings,
            logger,
        }
    }

    pub fn is_enabled(&self) -> bool {
        if !self.process_override.allows_telemetry() {
            return false;
        }
        self.user_preference()
    }

    fn user_preference(&self) -> bool {
        match self
            .settings
            .get_boolean(TELEMETRY_ENABLED_KEY, TELEMETRY_ENABLED_DEFAULT)
        {
            Ok(enabled) => enabled,
            Err(e) => {
                // Fail open to the documented default.
                self.logger
                    .error("Telemetry preference unreadable, using default: ", &e);
                TELEMETRY_ENABLED_DEFAULT
            }
        }
    }
}

impl std::fmt::Debug for ConsentGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentGate")
            .field("process_override", &self.process_override)
            .finish_non_exhaustive()
    }
}
