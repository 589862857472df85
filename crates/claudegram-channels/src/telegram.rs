//! Telegram channel: bot integration via `teloxide`.
//!
//! Features:
//! - Long polling (no webhook/public IP needed)
//! - Text messages only; other media is ignored
//! - Typing indicator and document upload on request from the bridge
//! - Command menu registration at startup

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatAction, InputFile, UpdateKind};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use claudegram_core::bus::{InboundMessage, MessageBus, OutboundMessage, OutboundPayload};

/// Channel name used on the bus.
pub const CHANNEL_NAME: &str = "telegram";

/// Long-poll timeout for `getUpdates`, in seconds.
const POLL_TIMEOUT_SECS: u32 = 30;

// ─────────────────────────────────────────────
// TelegramChannel
// ─────────────────────────────────────────────

/// Telegram bot channel using long polling via `teloxide`.
pub struct TelegramChannel {
    bot: Bot,
    /// Message bus for inbound messages.
    bus: Arc<MessageBus>,
    /// Command menu advertised to clients, `(name, description)`.
    commands: Vec<(String, String)>,
    /// Bot username from `getMe`, set on start.
    username: OnceLock<String>,
    /// Shutdown signal.
    shutdown: Arc<Notify>,
}

impl TelegramChannel {
    /// Create a new Telegram channel for `token`.
    pub fn new(token: &str, bus: Arc<MessageBus>) -> Self {
        Self {
            bot: Bot::new(token),
            bus,
            commands: Vec::new(),
            username: OnceLock::new(),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Set the command menu registered with Telegram on start.
    pub fn with_commands(mut self, commands: &[(&str, &str)]) -> Self {
        self.commands = commands
            .iter()
            .map(|(name, description)| (name.to_string(), description.to_string()))
            .collect();
        self
    }

    /// Turn a received update into a bus message, if it carries text.
    async fn handle_update(&self, update: &Update) {
        let UpdateKind::Message(message) = &update.kind else {
            return;
        };
        let Some(user) = message.from.as_ref() else {
            return;
        };
        let Some(text) = message.text() else {
            debug!(chat_id = message.chat.id.0, "non-text message, ignoring");
            return;
        };
        if addressed_to_other_bot(text, self.username.get().map(String::as_str)) {
            debug!(chat_id = message.chat.id.0, "command for another bot, ignoring");
            return;
        }

        let inbound = build_inbound(
            user.id.0 as i64,
            message.chat.id.0,
            &user.first_name,
            user.username.as_deref(),
            message.id.0,
            text,
        );

        debug!(
            user_id = inbound.user_id,
            chat_id = inbound.chat_id,
            content_len = inbound.content.len(),
            "telegram inbound message"
        );

        if let Err(e) = self.bus.publish_inbound(inbound).await {
            error!(error = %e, "failed to publish telegram message to bus");
        }
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> anyhow::Result<()> {
        self.bot.send_message(chat_id, text).await?;
        Ok(())
    }
}

/// Bot named in a command like `/cd@other_bot`, if any.
fn command_target(text: &str) -> Option<&str> {
    let head = text.split_whitespace().next()?;
    if !head.starts_with('/') {
        return None;
    }
    head.split_once('@').map(|(_, bot)| bot)
}

/// True when `text` is a command explicitly addressed to a different bot.
///
/// Without a known username every command is accepted.
fn addressed_to_other_bot(text: &str, own_username: Option<&str>) -> bool {
    match (command_target(text), own_username) {
        (Some(target), Some(own)) => !target.eq_ignore_ascii_case(own),
        _ => false,
    }
}

/// Build an `InboundMessage` from the fields of a Telegram text message.
fn build_inbound(
    user_id: i64,
    chat_id: i64,
    first_name: &str,
    username: Option<&str>,
    message_id: i32,
    text: &str,
) -> InboundMessage {
    let mut inbound =
        InboundMessage::new(CHANNEL_NAME, user_id, chat_id, text).with_first_name(first_name);
    inbound
        .metadata
        .insert("message_id".into(), message_id.to_string());
    if let Some(username) = username {
        inbound.metadata.insert("username".into(), username.to_string());
    }
    inbound
}

#[async_trait]
impl crate::base::Channel for TelegramChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn start(&self) -> anyhow::Result<()> {
        info!("starting telegram channel (long polling)");

        match self.bot.get_me().await {
            Ok(me) => {
                if let Some(username) = me.user.username.clone() {
                    info!(username = %username, "telegram bot identity");
                    let _ = self.username.set(username);
                }
            }
            Err(e) => warn!(error = %e, "failed to fetch bot identity"),
        }

        if !self.commands.is_empty() {
            let menu: Vec<BotCommand> = self
                .commands
                .iter()
                .map(|(name, description)| BotCommand::new(name, description))
                .collect();
            if let Err(e) = self.bot.set_my_commands(menu).await {
                warn!(error = %e, "failed to set bot commands menu");
            }
        }

        info!("telegram bot connected, polling for updates");

        let mut offset: i32 = 0;

        loop {
            tokio::select! {
                updates = self.bot.get_updates().offset(offset).timeout(POLL_TIMEOUT_SECS).send() => {
                    match updates {
                        Ok(updates) => {
                            for update in &updates {
                                offset = (update.id.0 as i32).wrapping_add(1);
                                self.handle_update(update).await;
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "telegram polling error");
                            tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                        }
                    }
                }
                _ = self.shutdown.notified() => {
                    info!("telegram channel shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        info!("stopping telegram channel");
        self.shutdown.notify_waiters();
        Ok(())
    }

    async fn send(&self, msg: &OutboundMessage) -> anyhow::Result<()> {
        let chat_id = ChatId(msg.chat_id);

        match &msg.payload {
            OutboundPayload::Text(text) => {
                self.send_text(chat_id, text).await?;
                debug!(chat_id = msg.chat_id, "telegram message sent");
            }
            OutboundPayload::Typing => {
                // Best effort: a lost indicator is harmless.
                if let Err(e) = self.bot.send_chat_action(chat_id, ChatAction::Typing).await {
                    debug!(error = %e, "failed to send typing indicator");
                }
            }
            OutboundPayload::Document { path, filename } => {
                let file = InputFile::file(path.clone()).file_name(filename.clone());
                if let Err(e) = self.bot.send_document(chat_id, file).await {
                    warn!(path = %path.display(), error = %e, "failed to send document");
                    self.send_text(chat_id, &format!("Error: {e}")).await?;
                } else {
                    debug!(chat_id = msg.chat_id, path = %path.display(), "telegram document sent");
                }
            }
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
