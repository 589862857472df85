//! Config loader: reads `config.json` and applies environment overrides.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file (by default `config.json` next to the executable)
//! 3. Environment variables `TELEGRAM_BOT_TOKEN`, `ALLOWED_USER_IDS`,
//!    `WORKING_DIR`. A variable that is *present* wins over the file, even
//!    when its value is empty.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::schema::{parse_allowed_user_ids, Config};
use crate::error::ConfigError;

/// Env var holding the bot token.
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
/// Env var holding the allow-list.
pub const ENV_ALLOWED_USER_IDS: &str = "ALLOWED_USER_IDS";
/// Env var holding the initial working directory.
pub const ENV_WORKING_DIR: &str = "WORKING_DIR";

/// Default config file path: `config.json` in the application directory.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_app_dir().join("config.json")
}

/// Load configuration from `path` (or the default path) plus env vars.
///
/// A missing file is not an error: the environment may carry every
/// setting. An unreadable or malformed file is.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    let config = read_config_file(&config_path)?;
    Ok(apply_env_overrides(config))
}

/// Read and parse the JSON file, falling back to defaults if it is absent.
fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply process environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides using an arbitrary variable lookup.
fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_BOT_TOKEN) {
        debug!("{ENV_BOT_TOKEN} set, overriding config file");
        config.telegram_bot_token = val;
    }
    if let Some(val) = lookup(ENV_ALLOWED_USER_IDS) {
        debug!("{ENV_ALLOWED_USER_IDS} set, overriding config file");
        config.allowed_user_ids = parse_allowed_user_ids(&val);
    }
    if let Some(val) = lookup(ENV_WORKING_DIR) {
        debug!("{ENV_WORKING_DIR} set, overriding config file");
        config.working_dir = val;
    }
    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
