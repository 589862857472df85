//! Bridge orchestrator: turns inbound chat messages into replies.
//!
//! Commands are handled inline on the receive loop. Prompts are authorized,
//! acknowledged with a typing indicator and handed to a worker task so one
//! slow invocation never blocks other users.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use claudegram_core::bus::{InboundMessage, MessageBus, OutboundMessage};
use claudegram_core::session::ConversationState;
use claudegram_core::utils::preview;

use crate::auth::{self, AuthorizationPolicy};
use crate::chunker;
use crate::commands::{help_text, parse_command, BridgeCommand};
use crate::files;
use crate::invoker::{InvocationRequest, Invoker};
use crate::workdir::WorkingDirectory;

/// Longest text sent in one chat message.
pub const MAX_CHUNK_SIZE: usize = 4000;

/// Reply to anyone outside the allow-list.
pub const NOT_AUTHORIZED: &str = "You are not authorized to use this bot.";

/// Characters of each prompt written to the log.
const LOG_PREVIEW_CHARS: usize = 50;

// ─────────────────────────────────────────────
// Bridge
// ─────────────────────────────────────────────

/// Shared handle to the orchestrator. Clones refer to the same state.
#[derive(Clone)]
pub struct Bridge {
    bus: Arc<MessageBus>,
    invoker: Arc<dyn Invoker>,
    policy: Arc<AuthorizationPolicy>,
    conversations: Arc<ConversationState>,
    workdir: Arc<WorkingDirectory>,
    limiter: Arc<Semaphore>,
}

impl Bridge {
    /// Build a bridge. At most `max_concurrent` invocations run at once.
    pub fn new(
        bus: Arc<MessageBus>,
        invoker: Arc<dyn Invoker>,
        policy: AuthorizationPolicy,
        workdir: Arc<WorkingDirectory>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            bus,
            invoker,
            policy: Arc::new(policy),
            conversations: Arc::new(ConversationState::new()),
            workdir,
            limiter: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub fn conversations(&self) -> &ConversationState {
        &self.conversations
    }

    pub fn workdir(&self) -> &WorkingDirectory {
        &self.workdir
    }

    /// Consume inbound messages until the bus closes.
    pub async fn run(&self) {
        info!("bridge started, waiting for messages");
        while let Some(msg) = self.bus.consume_inbound().await {
            debug!(user_id = msg.user_id, chat_id = msg.chat_id, "received message");
            // Workers report their own failures; replies go through the bus.
            let _ = self.dispatch(msg).await;
        }
        info!("inbound channel closed, bridge exiting");
    }

    /// Handle one message.
    ///
    /// Commands complete before this returns. For prompts the spawned
    /// worker is returned so callers can wait for the reply.
    pub async fn dispatch(&self, msg: InboundMessage) -> Option<JoinHandle<()>> {
        let command = parse_command(&msg.content);

        if command != Some(BridgeCommand::Start) && !auth::is_allowed(msg.user_id, &self.policy) {
            warn!(user_id = msg.user_id, "unauthorized access attempt");
            self.reply(&msg, NOT_AUTHORIZED).await;
            return None;
        }

        if let Some(command) = command {
            self.handle_command(&msg, command).await;
            return None;
        }

        Some(self.dispatch_prompt(msg).await)
    }

    async fn dispatch_prompt(&self, msg: InboundMessage) -> JoinHandle<()> {
        info!(
            user_id = msg.user_id,
            prompt = %preview(&msg.content, LOG_PREVIEW_CHARS),
            "prompt received"
        );
        self.publish(OutboundMessage::typing(&msg.channel, msg.chat_id))
            .await;

        // Read the flag here so the next message from the same user already
        // sees it cleared, regardless of worker scheduling.
        let fresh = self.conversations.consume_fresh_flag(msg.user_id);
        let request = InvocationRequest {
            prompt: msg.content,
            continue_conversation: !fresh,
            cwd: self.workdir.current(),
        };

        let bridge = self.clone();
        let channel = msg.channel;
        let chat_id = msg.chat_id;
        let worker = {
            let bridge = bridge.clone();
            let channel = channel.clone();
            tokio::spawn(async move {
                bridge.complete(&channel, chat_id, request).await;
            })
        };

        tokio::spawn(async move {
            if let Err(e) = worker.await {
                error!(chat_id, error = %e, "invocation worker failed");
                bridge
                    .publish(OutboundMessage::text(&channel, chat_id, format!("Error: {e}")))
                    .await;
            }
        })
    }

    /// Run one invocation and publish its reply in chunks.
    async fn complete(&self, channel: &str, chat_id: i64, request: InvocationRequest) {
        let result = {
            let _permit = self.limiter.acquire().await.ok();
            self.invoker.invoke(request).await
        };
        debug!(chat_id, ?result, "invocation finished");

        let reply = result.into_reply();
        for chunk in chunker::split(&reply, MAX_CHUNK_SIZE) {
            self.publish(OutboundMessage::text(channel, chat_id, chunk))
                .await;
        }
    }

    async fn handle_command(&self, msg: &InboundMessage, command: BridgeCommand) {
        debug!(user_id = msg.user_id, ?command, "handling command");
        match command {
            BridgeCommand::Start => {
                let text = format!(
                    "Hello {}!\n\nYour Telegram ID: {}\n\n\
                     Add this ID to config.json to restrict access to yourself only.\n\n\
                     Send a message and I'll forward it to Claude.",
                    msg.first_name, msg.user_id
                );
                self.reply(msg, text).await;
            }
            BridgeCommand::Help => self.reply(msg, help_text()).await,
            BridgeCommand::Reset => {
                self.conversations.mark_fresh_requested(msg.user_id);
                self.reply(msg, "Next message will start a new conversation.")
                    .await;
            }
            BridgeCommand::Pwd => {
                let text = format!("Working directory: {}", self.workdir.current().display());
                self.reply(msg, text).await;
            }
            BridgeCommand::Cd(None) => {
                let text = format!(
                    "Current directory: {}\n\nUsage: /cd /path/to/project",
                    self.workdir.current().display()
                );
                self.reply(msg, text).await;
            }
            BridgeCommand::Cd(Some(path)) => {
                let text = match self.workdir.change(&path) {
                    Ok(dir) => format!("Working directory changed to: {}", dir.display()),
                    Err(e) => e.to_string(),
                };
                self.reply(msg, text).await;
            }
            BridgeCommand::GetFile(None) => {
                self.reply(msg, "Usage: /getfile file_path\nExample: /getfile src/main.rs")
                    .await;
            }
            BridgeCommand::GetFile(Some(path)) => match files::retrieve(&self.workdir, &path).await {
                Ok(file) => {
                    info!(user_id = msg.user_id, path = %file.path.display(), "sending file");
                    self.publish(OutboundMessage::document(
                        &msg.channel,
                        msg.chat_id,
                        file.path,
                        file.filename,
                    ))
                    .await;
                }
                Err(e) => self.reply(msg, e.to_string()).await,
            },
        }
    }

    async fn reply(&self, msg: &InboundMessage, text: impl Into<String>) {
        self.publish(OutboundMessage::text(&msg.channel, msg.chat_id, text))
            .await;
    }

    async fn publish(&self, msg: OutboundMessage) {
        if let Err(e) = self.bus.publish_outbound(msg).await {
            error!(error = %e, "failed to publish outbound message");
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
