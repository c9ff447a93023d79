pub mod config;
pub mod gate;
pub mod services;
pub mod sinks;

// Re-export specific items for convenient access
pub use config::GateConfig;
pub use gate::dispatcher::TelemetryDispatcher;
