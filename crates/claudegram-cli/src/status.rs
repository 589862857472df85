//! `claudegram status`: show configuration status.
//!
//! Reports the config file, token presence, allow-list, working directory
//! and whether the Claude CLI can be found.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use claudegram_bridge::invoker::resolve_binary;
use claudegram_core::config::{get_config_path, load_config};
use claudegram_core::utils::get_app_dir;

use crate::helpers::describe_allow_list;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);
    let config = load_config(Some(&path)).context("failed to load configuration")?;

    let ok = || "✓".green().to_string();

    println!();
    println!("{}", "Claudegram Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            ok()
        } else {
            "(not found, using env)".yellow().to_string()
        }
    );

    println!(
        "  {:<18} {}",
        "Bot token:".bold(),
        if config.has_token() {
            format!("{} (set)", ok())
        } else {
            "✗ not set".red().to_string()
        }
    );

    println!(
        "  {:<18} {}",
        "Allowed users:".bold(),
        describe_allow_list(&config.allowed_user_ids)
    );

    let workdir = match config.resolve_working_dir(&get_app_dir()) {
        Ok(dir) => format!("{} {}", dir.display(), ok()),
        Err(e) => format!("{}", e.to_string().red()),
    };
    println!("  {:<18} {}", "Working dir:".bold(), workdir);

    let binary = match resolve_binary(&config.claude_command) {
        Some(bin) => format!("{} {}", bin.display(), ok()),
        None => format!(
            "{} {}",
            config.claude_command,
            "(not found in PATH)".red()
        ),
    };
    println!("  {:<18} {}", "Claude CLI:".bold(), binary);

    println!(
        "  {:<18} {}",
        "Max concurrent:".bold(),
        config.max_concurrent_invocations
    );

    println!();

    Ok(())
}
