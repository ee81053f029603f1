//! System orchestration, configuration, startup, and shutdown logic.

pub mod settings_system;
pub mod config;
pub mod logging;

pub use settings_system::*;
pub use config::*;
pub use logging::*;
