use std::path::PathBuf;

use thiserror::Error;

use crate::gate::consent::ProcessOverride;

pub const ENV_DISABLE: &str = "TELEMETRY_GATE_DISABLE";
pub const ENV_SETTINGS_PATH: &str = "TELEMETRY_GATE_SETTINGS";
pub const ENV_ENDPOINT: &str = "TELEMETRY_GATE_ENDPOINT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is set but empty")]
    Empty { var: &'static str },

    #[error("TELEMETRY_GATE_ENDPOINT must be an http(s) URL, got '{0}'")]
    BadEndpoint(String),
}

/// Launch configuration. Captured once at startup; the process override in
/// particular never changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateConfig {
    pub process_override: ProcessOverride,
    /// JSON settings file. `None` keeps preferences in memory only.
    pub settings_path: Option<PathBuf>,
    /// Analytics collector URL. `None` routes analytics to the local log.
    pub analytics_endpoint: Option<String>,
}

impl GateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let process_override = ProcessOverride::from_flag(lookup(ENV_DISABLE).as_deref());

        let settings_path = match lookup(ENV_SETTINGS_PATH) {
            Some(p) if p.trim().is_empty() => {
                return Err(ConfigError::Empty {
                    var: ENV_SETTINGS_PATH,
                })
            }
            Some(p) => Some(PathBuf::from(p)),
            None => None,
        };

        let analytics_endpoint = match lookup(ENV_ENDPOINT) {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::Empty { var: ENV_ENDPOINT })
            }
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                return Err(ConfigError::BadEndpoint(url))
            }
            Some(url) => Some(url),
            None => None,
        };

        Ok(Self {
            process_override,
            settings_path,
            analytics_endpoint,
        })
    }
}
