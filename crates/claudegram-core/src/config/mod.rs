//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use claudegram_core::config;
//!
//! let cfg = config::load_config(None).expect("invalid configuration");
//! println!("Allowed users: {:?}", cfg.allowed_user_ids);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{apply_env_overrides, get_config_path, load_config};
pub use schema::{parse_allowed_user_ids, Config};
