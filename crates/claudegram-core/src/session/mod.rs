//! Per-user session state.
//!
//! Sessions live in memory for the lifetime of the process, keyed by the
//! chat platform's user id, and are created lazily on first access.

pub mod manager;

pub use manager::{ConversationState, Session};
