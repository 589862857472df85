//! Bus event types: messages flowing between channels and the bridge.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;

/// Stable per-user identifier as issued by the chat platform.
pub type UserId = i64;

/// An inbound message from a channel to the bridge.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Sender identifier within the channel.
    pub user_id: UserId,
    /// Chat the message was posted in; replies go here.
    pub chat_id: i64,
    /// Sender's display name (used by `/start`).
    pub first_name: String,
    /// Raw text of the message, commands included.
    pub content: String,
    /// When the message was received.
    pub timestamp: DateTime<Utc>,
    /// Channel-specific metadata (e.g. message_id, username).
    pub metadata: HashMap<String, String>,
}

impl InboundMessage {
    /// Create a new inbound message with minimal required fields.
    pub fn new(
        channel: impl Into<String>,
        user_id: UserId,
        chat_id: i64,
        content: impl Into<String>,
    ) -> Self {
        InboundMessage {
            channel: channel.into(),
            user_id,
            chat_id,
            first_name: String::new(),
            content: content.into(),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Set the sender's display name.
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }
}

/// What an outbound message carries.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundPayload {
    /// Plain text reply.
    Text(String),
    /// "typing…" presence indicator.
    Typing,
    /// A local file sent as a document attachment.
    Document { path: PathBuf, filename: String },
}

/// An outbound message from the bridge to a channel.
#[derive(Clone, Debug)]
pub struct OutboundMessage {
    /// Target channel name.
    pub channel: String,
    /// Target chat identifier.
    pub chat_id: i64,
    /// Content to deliver.
    pub payload: OutboundPayload,
}

impl OutboundMessage {
    /// Create a plain text outbound message.
    pub fn text(channel: impl Into<String>, chat_id: i64, content: impl Into<String>) -> Self {
        OutboundMessage {
            channel: channel.into(),
            chat_id,
            payload: OutboundPayload::Text(content.into()),
        }
    }

    /// Create a typing indicator.
    pub fn typing(channel: impl Into<String>, chat_id: i64) -> Self {
        OutboundMessage {
            channel: channel.into(),
            chat_id,
            payload: OutboundPayload::Typing,
        }
    }

    /// Create a document attachment.
    pub fn document(
        channel: impl Into<String>,
        chat_id: i64,
        path: impl Into<PathBuf>,
        filename: impl Into<String>,
    ) -> Self {
        OutboundMessage {
            channel: channel.into(),
            chat_id,
            payload: OutboundPayload::Document {
                path: path.into(),
                filename: filename.into(),
            },
        }
    }

    /// Text content, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            OutboundPayload::Text(text) => Some(text),
            _ => None,
        }
    }
}
