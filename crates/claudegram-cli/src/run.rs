//! `claudegram run`: wires the bridge to the Telegram channel.
//!
//! Startup sequence:
//! 1. Load config, validate the token, resolve the working directory
//! 2. Resolve the Claude CLI (missing binary only warns)
//! 3. Create message bus, bridge, channel manager
//! 4. Run: `tokio::select!` of bridge + channel manager
//! 5. Handle Ctrl+C for graceful shutdown

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use claudegram_bridge::{AuthorizationPolicy, Bridge, ClaudeCli, WorkingDirectory};
use claudegram_channels::ChannelManager;
use claudegram_core::bus::MessageBus;

use crate::helpers;

/// Capacity of each bus queue.
const BUS_CAPACITY: usize = 100;

/// Run the bot until Ctrl+C.
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let (config, workdir) = helpers::load_settings(config_path)?;
    config.validate().context("cannot start the bot")?;

    let invoker = ClaudeCli::new(&config.claude_command);
    if invoker.binary().is_none() {
        warn!(
            command = %config.claude_command,
            "claude CLI not found; every prompt will answer with an error"
        );
    }
    let binary = invoker.binary().map(Path::to_path_buf);

    let policy = AuthorizationPolicy::new(config.allowed_user_ids.iter().copied());
    if !policy.is_restricted() {
        warn!("allowed_user_ids is empty: anyone who finds the bot can use it");
    }

    let bus = Arc::new(MessageBus::new(BUS_CAPACITY));
    let bridge = Bridge::new(
        bus.clone(),
        Arc::new(invoker),
        policy,
        Arc::new(WorkingDirectory::new(&workdir)),
        config.max_concurrent_invocations,
    );

    #[allow(unused_mut)]
    let mut channel_manager = ChannelManager::new(bus.clone());

    #[cfg(feature = "telegram")]
    {
        use claudegram_bridge::BOT_COMMANDS;
        use claudegram_channels::telegram::TelegramChannel;

        let telegram = TelegramChannel::new(config.telegram_bot_token.trim(), bus.clone())
            .with_commands(BOT_COMMANDS);
        channel_manager.register(Arc::new(telegram));
    }

    if channel_manager.is_empty() {
        anyhow::bail!("no chat transport available: build with the `telegram` feature");
    }

    info!(
        workdir = %workdir.display(),
        channels = ?channel_manager.channel_names(),
        max_concurrent = config.max_concurrent_invocations,
        "claudegram starting"
    );

    helpers::print_banner(binary.as_deref(), &workdir, &config.allowed_user_ids);

    println!("  Ctrl+C to stop");
    println!();

    tokio::select! {
        _ = bridge.run() => {
            info!("bridge exited");
        }
        result = channel_manager.start_all() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "channel manager error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("  Shutting down...");
            info!("received Ctrl+C, shutting down");
            channel_manager.stop_all().await;
        }
    }

    println!("  Stopped. Goodbye!");
    Ok(())
}
