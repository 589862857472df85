//! Conversation continuity tracking.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::bus::types::UserId;

// ─────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────

/// Per-user session record.
#[derive(Clone, Debug)]
pub struct Session {
    /// Owner of the session.
    pub user_id: UserId,
    /// When set, the next invocation must start a fresh conversation.
    pub fresh_requested: bool,
    /// When the session was first seen.
    pub created_at: DateTime<Utc>,
    /// Last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// A brand-new session: continuation allowed, no fresh flag.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Session {
            user_id,
            fresh_requested: false,
            created_at: now,
            updated_at: now,
        }
    }
}

// ─────────────────────────────────────────────
// ConversationState
// ─────────────────────────────────────────────

/// Tracks, per user, whether the next turn continues the prior conversation.
///
/// Unseen users default to continuing. The assistant treats "continue" with
/// no prior session as a fresh start, so a first message needs no special
/// case.
///
/// Thread-safe via `RwLock`; reads and read-and-clear are atomic per call.
/// Concurrent messages from the same user are not serialized.
#[derive(Debug, Default)]
pub struct ConversationState {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl ConversationState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the next invocation for `user_id` continues the conversation.
    pub fn should_continue(&self, user_id: UserId) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(&user_id)
            .map_or(true, |session| !session.fresh_requested)
    }

    /// Request that the next invocation start a fresh conversation. Idempotent.
    pub fn mark_fresh_requested(&self, user_id: UserId) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id));
        session.fresh_requested = true;
        session.updated_at = Utc::now();
        debug!(user_id, "fresh conversation requested");
    }

    /// Read and clear the fresh flag.
    ///
    /// Returns `true` (and clears the flag) if a fresh conversation was
    /// requested; otherwise returns `false` and changes nothing but the lazy
    /// creation of the session record.
    pub fn consume_fresh_flag(&self, user_id: UserId) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id));
        if session.fresh_requested {
            session.fresh_requested = false;
            session.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    /// Snapshot of a user's session, if one exists.
    pub fn get(&self, user_id: UserId) -> Option<Session> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(&user_id).cloned()
    }

    /// Number of users seen so far.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no user has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
