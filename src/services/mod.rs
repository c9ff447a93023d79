//! Host-side collaborators of the gate: the local logger and the settings
//! store holding the user's consent flag.

pub mod logger;
pub mod settings;

pub use logger::*;
pub use settings::*;
