//! Configuration schema.
//!
//! `config.json` uses snake_case keys:
//!
//! ```json
//! {
//!   "telegram_bot_token": "123:ABC",
//!   "allowed_user_ids": [123456789],
//!   "working_dir": "/home/me/projects"
//! }
//! ```
//!
//! `allowed_user_ids` may also be written as a string (`"1, 2 3"`), parsed
//! the same way as the `ALLOWED_USER_IDS` environment variable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::utils::expand_home;

/// Token value shipped in `config.example.json`; treated as unset.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

/// Default assistant executable looked up in `PATH`.
pub const DEFAULT_CLAUDE_COMMAND: &str = "claude";

/// Default number of assistant processes allowed to run at once.
pub const DEFAULT_MAX_CONCURRENT_INVOCATIONS: usize = 4;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `config.json` + env vars.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bot token from @BotFather.
    pub telegram_bot_token: String,
    /// Users allowed to talk to the bridge. Empty = everyone.
    #[serde(deserialize_with = "deserialize_user_ids")]
    pub allowed_user_ids: Vec<i64>,
    /// Initial working directory. Empty = the application's own directory.
    pub working_dir: String,
    /// Assistant executable name or path.
    pub claude_command: String,
    /// Upper bound on simultaneously running assistant processes.
    pub max_concurrent_invocations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_bot_token: String::new(),
            allowed_user_ids: Vec::new(),
            working_dir: String::new(),
            claude_command: DEFAULT_CLAUDE_COMMAND.to_string(),
            max_concurrent_invocations: DEFAULT_MAX_CONCURRENT_INVOCATIONS,
        }
    }
}

impl Config {
    /// Whether a real bot token is configured.
    pub fn has_token(&self) -> bool {
        let token = self.telegram_bot_token.trim();
        !token.is_empty() && token != PLACEHOLDER_TOKEN
    }

    /// Check the settings required to launch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.has_token() {
            return Err(ConfigError::MissingToken);
        }
        if self.max_concurrent_invocations == 0 {
            return Err(ConfigError::Invalid {
                field: "max_concurrent_invocations",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Resolve the initial working directory.
    ///
    /// An empty `working_dir` falls back to `default_dir`. The result must be
    /// an existing directory.
    pub fn resolve_working_dir(&self, default_dir: &Path) -> Result<PathBuf, ConfigError> {
        let dir = if self.working_dir.trim().is_empty() {
            default_dir.to_path_buf()
        } else {
            expand_home(self.working_dir.trim())
        };

        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(ConfigError::WorkingDirNotFound(dir))
        }
    }
}

// ─────────────────────────────────────────────
// Allow-list parsing
// ─────────────────────────────────────────────

/// Parse an allow-list from free-form text.
///
/// Accepts a JSON array (`[1, "2", 3]`) or integers separated by commas
/// and/or whitespace (`"1, 2 3"`). Tokens that are not integers are dropped.
pub fn parse_allowed_user_ids(raw: &str) -> Vec<i64> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
            return items.iter().filter_map(user_id_from_value).collect();
        }
    }

    trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<i64>().ok())
        .collect()
}

/// Convert a single JSON allow-list entry into a user id.
fn user_id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn deserialize_user_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(user_id_from_value).collect(),
        Value::String(s) => parse_allowed_user_ids(&s),
        Value::Number(_) => user_id_from_value(&value).into_iter().collect(),
        _ => Vec::new(),
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
