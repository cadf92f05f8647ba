//! CLI command implementations.

mod config;
mod doctor;
mod start;

pub use config::run_config;
pub use doctor::run_doctor;
pub use start::run_start;
