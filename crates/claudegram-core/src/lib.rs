//! Claudegram Core: shared types, message bus, configuration, and
//! per-user session state.

pub mod bus;
pub mod config;
pub mod error;
pub mod session;
pub mod utils;

pub use error::ConfigError;
