//! Channel Manager: transport lifecycle and outbound routing.
//!
//! Responsibilities:
//! - Register transports
//! - Start/stop them via `tokio::spawn`
//! - Drain the outbound queue and hand each message to its transport

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use claudegram_core::bus::{MessageBus, OutboundMessage, OutboundPayload};

use crate::base::Channel;

// ─────────────────────────────────────────────
// ChannelManager
// ─────────────────────────────────────────────

/// Manages the lifecycle and message routing for all transports.
///
/// A single dispatcher task reads the outbound queue and awaits each
/// `send()` before taking the next message, which keeps reply chunks in
/// publish order.
pub struct ChannelManager {
    /// Registered channels, keyed by name.
    channels: HashMap<String, Arc<dyn Channel>>,
    /// Message bus for outbound message consumption.
    bus: Arc<MessageBus>,
    /// Shutdown signal.
    shutdown: Arc<Notify>,
}

impl ChannelManager {
    /// Create a new channel manager.
    pub fn new(bus: Arc<MessageBus>) -> Self {
        Self {
            channels: HashMap::new(),
            bus,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Register a channel. Overwrites any previous channel with the same name.
    pub fn register(&mut self, channel: Arc<dyn Channel>) {
        let name = channel.name().to_string();
        info!(channel = %name, "registered channel");
        self.channels.insert(name, channel);
    }

    /// Names of all registered channels, sorted.
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Start all channels + the outbound dispatcher.
    ///
    /// Blocks until shutdown is signaled.
    pub async fn start_all(&self) -> Result<()> {
        if self.channels.is_empty() {
            warn!("no channels registered, nothing to start");
            return Ok(());
        }

        info!(
            channels = ?self.channel_names(),
            "starting {} channel(s)",
            self.channels.len()
        );

        for (name, channel) in &self.channels {
            let ch = channel.clone();
            let ch_name = name.clone();

            tokio::spawn(async move {
                info!(channel = %ch_name, "channel starting");
                if let Err(e) = ch.start().await {
                    error!(channel = %ch_name, error = %e, "channel start failed");
                }
                info!(channel = %ch_name, "channel stopped");
            });
        }

        let bus = self.bus.clone();
        let channels = self.channels.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            Self::dispatch_outbound(bus, channels, shutdown).await;
        });

        self.shutdown.notified().await;

        info!("channel manager shutting down");
        Ok(())
    }

    /// Stop all channels and the outbound dispatcher.
    pub async fn stop_all(&self) {
        info!("stopping all channels");

        self.shutdown.notify_waiters();

        for (name, channel) in &self.channels {
            debug!(channel = %name, "stopping channel");
            if let Err(e) = channel.stop().await {
                error!(channel = %name, error = %e, "channel stop failed");
            }
        }

        info!("all channels stopped");
    }

    /// Route outbound messages to their channel, one at a time.
    async fn dispatch_outbound(
        bus: Arc<MessageBus>,
        channels: HashMap<String, Arc<dyn Channel>>,
        shutdown: Arc<Notify>,
    ) {
        info!("outbound dispatcher started");

        loop {
            tokio::select! {
                msg = bus.consume_outbound() => {
                    match msg {
                        Some(outbound) => Self::route(&channels, &outbound).await,
                        None => {
                            info!("outbound bus closed, dispatcher exiting");
                            break;
                        }
                    }
                }
                _ = shutdown.notified() => {
                    info!("dispatcher received shutdown signal");
                    break;
                }
            }
        }
    }

    async fn route(channels: &HashMap<String, Arc<dyn Channel>>, outbound: &OutboundMessage) {
        debug!(
            channel = %outbound.channel,
            chat_id = outbound.chat_id,
            kind = payload_kind(&outbound.payload),
            "dispatching outbound message"
        );

        let Some(channel) = channels.get(&outbound.channel) else {
            warn!(channel = %outbound.channel, "no channel registered for outbound message");
            return;
        };

        if let Err(e) = channel.send(outbound).await {
            error!(
                channel = %outbound.channel,
                chat_id = outbound.chat_id,
                error = %e,
                "failed to send outbound message"
            );
        }
    }
}

fn payload_kind(payload: &OutboundPayload) -> &'static str {
    match payload {
        OutboundPayload::Text(_) => "text",
        OutboundPayload::Typing => "typing",
        OutboundPayload::Document { .. } => "document",
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
