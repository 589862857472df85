//! Claudegram CLI: entry point.
//!
//! # Commands
//!
//! - `claudegram run [--config PATH] [--logs]`: start the Telegram bridge
//! - `claudegram status [--config PATH]`: show configuration status
//! - `claudegram ask PROMPT [--fresh] [--cwd DIR]`: one local invocation

mod ask;
mod helpers;
mod run;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Claudegram: drive the Claude CLI from Telegram
#[derive(Parser)]
#[command(name = "claudegram", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (Telegram polling + bridge)
    Run {
        /// Config file (default: config.json next to the executable)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration status
    Status {
        /// Config file (default: config.json next to the executable)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Send one prompt to Claude and print the reply
    Ask {
        /// The prompt text
        prompt: String,

        /// Start a new conversation instead of continuing
        #[arg(long, default_value_t = false)]
        fresh: bool,

        /// Directory to run in (default: configured working directory)
        #[arg(long)]
        cwd: Option<PathBuf>,

        /// Config file (default: config.json next to the executable)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, logs } => {
            init_logging(default_filter(logs));
            run::run(config.as_deref()).await
        }
        Commands::Status { config } => status::run(config.as_deref()),
        Commands::Ask {
            prompt,
            fresh,
            cwd,
            config,
            logs,
        } => {
            init_logging(default_filter(logs));
            ask::run(&prompt, fresh, cwd, config.as_deref()).await
        }
    }
}

/// Log filter used when `RUST_LOG` is unset.
fn default_filter(logs: bool) -> &'static str {
    if logs {
        "claudegram=debug,info"
    } else {
        "info"
    }
}

/// Initialize tracing. `RUST_LOG` takes precedence over `fallback`.
fn init_logging(fallback: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
