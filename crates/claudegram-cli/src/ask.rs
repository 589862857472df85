//! `claudegram ask`: run a single prompt without Telegram.
//!
//! Uses the same invoker and reply text as the bot, which makes it handy
//! for checking the CLI setup before going live.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use tracing::info;

use claudegram_bridge::{ClaudeCli, InvocationRequest, InvocationResult, Invoker};

use crate::helpers;

/// Invoke Claude once and print the reply.
pub async fn run(
    prompt: &str,
    fresh: bool,
    cwd: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let (config, workdir) = helpers::load_settings(config_path)?;
    let cwd = cwd.unwrap_or(workdir);

    let invoker = ClaudeCli::new(&config.claude_command);
    let request = InvocationRequest {
        prompt: prompt.to_string(),
        continue_conversation: !fresh,
        cwd,
    };
    info!(cwd = %request.cwd.display(), fresh, "running single prompt");

    let result = invoker.invoke(request).await;
    let failed = !matches!(result, InvocationResult::Success(_));

    println!();
    println!("{}", "Claude".cyan().bold());
    println!("{}", result.into_reply());
    println!();

    if failed {
        anyhow::bail!("invocation did not produce a reply");
    }
    Ok(())
}
