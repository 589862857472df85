//! Message bus: bounded queues between the chat transport and the bridge.

pub mod queue;
pub mod types;

pub use queue::MessageBus;
pub use types::{InboundMessage, OutboundMessage, OutboundPayload, UserId};
