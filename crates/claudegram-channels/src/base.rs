//! Channel trait: the interface every chat transport implements.
//!
//! A transport:
//! - `start()`: receives user messages and publishes them to the bus (long-running)
//! - `stop()`: ends the receive loop
//! - `send()`: delivers one outbound payload (text, typing, document)
//! - `name()`: matches `InboundMessage.channel` / `OutboundMessage.channel`

use async_trait::async_trait;
use claudegram_core::bus::OutboundMessage;

/// Every chat transport implements this trait.
///
/// The `ChannelManager` holds `Arc<dyn Channel>` and routes outbound
/// messages to it by name.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Unique channel name (e.g. "telegram").
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    ///
    /// Runs until `stop()` is called.
    async fn start(&self) -> anyhow::Result<()>;

    /// Graceful shutdown.
    async fn stop(&self) -> anyhow::Result<()>;

    /// Deliver an outbound message.
    ///
    /// Called sequentially by the outbound dispatcher, so payloads for one
    /// chat arrive in the order they were published.
    async fn send(&self, msg: &OutboundMessage) -> anyhow::Result<()>;
}
