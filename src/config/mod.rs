//! Session configuration.

pub mod layout;
pub mod handle;

pub use layout::{LayoutConfig, HistoryConfig, ArrangementConfig, SimulationPulse, ConfigError};
pub use handle::{ConfigHandle, ListenerId};
