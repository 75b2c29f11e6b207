pub mod actuator;
pub mod adc;
pub mod calibration;
pub mod config;
pub mod data_log;
pub mod error;
mod exploit;
mod explore;
pub mod servo;
pub mod state;
pub mod tracker;

// Re-export commonly used types
pub use config::Config;
pub use error::TrackerError;
pub use state::TrackerState;
pub use tracker::{CycleReport, Exploration, SweepResult, Tracker};

#[cfg(test)]
pub(crate) mod mocks;
