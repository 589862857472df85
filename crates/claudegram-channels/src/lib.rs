//! Claudegram Channels: chat transports.
//!
//! This crate provides:
//! - **base**: The `Channel` trait every transport implements
//! - **manager**: `ChannelManager`, lifecycle and ordered outbound routing
//! - **telegram** (feature `telegram`): long-polling Telegram bot

pub mod base;
pub mod manager;

#[cfg(feature = "telegram")]
pub mod telegram;

pub use base::Channel;
pub use manager::ChannelManager;
