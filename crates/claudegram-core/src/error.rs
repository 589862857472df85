//! Startup error taxonomy.

use std::path::PathBuf;

/// Errors that prevent the bot from starting.
///
/// Every variant is fatal and reported to the operator.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for the schema.
    #[error("Invalid JSON format in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No usable bot token in the file or the environment.
    #[error("Telegram bot token is not set (config telegram_bot_token or TELEGRAM_BOT_TOKEN)")]
    MissingToken,

    /// The initial working directory does not exist.
    #[error("Working directory not found: {}", .0.display())]
    WorkingDirNotFound(PathBuf),

    /// A setting has an unusable value.
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
