//! Shared CLI helpers: startup wiring and banner.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use claudegram_bridge::BOT_COMMANDS;
use claudegram_core::config::{load_config, Config};
use claudegram_core::utils::get_app_dir;

/// Load the config and resolve the initial working directory.
///
/// Fails on unreadable or invalid JSON and on a missing working directory.
/// The token is checked separately by the commands that need it.
pub fn load_settings(config_path: Option<&Path>) -> Result<(Config, PathBuf)> {
    let config = load_config(config_path).context("failed to load configuration")?;
    let workdir = config
        .resolve_working_dir(&get_app_dir())
        .context("invalid working directory")?;
    Ok((config, workdir))
}

/// Human-readable allow-list.
pub fn describe_allow_list(ids: &[i64]) -> String {
    if ids.is_empty() {
        "everyone (no allow-list)".to_string()
    } else {
        ids.iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Print the banner shown when the bot starts.
pub fn print_banner(binary: Option<&Path>, workdir: &Path, allowed: &[i64]) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "Claudegram".cyan().bold(), version.dimmed());
    println!();

    match binary {
        Some(path) => println!("  Claude CLI: {}", path.display()),
        None => println!(
            "  Claude CLI: {}",
            "not found in PATH (replies will report the error)".yellow()
        ),
    }
    println!("  Directory:  {}", workdir.display());
    println!("  Allowed:    {}", describe_allow_list(allowed));
    println!();
    println!("  {}", "Commands:".bold());
    for (name, description) in BOT_COMMANDS {
        println!("    /{name:<10} {}", description.dimmed());
    }
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
