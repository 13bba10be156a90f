//! Chat session state: bounded history, a pending confirmation slot and a
//! last-activity timestamp.
//!
//! Sessions are explicit objects handed to the handler; the registry caps
//! per-session history and evicts idle sessions, so conversation state
//! never grows without bound. Timestamps come in as parameters so the flow
//! stays deterministic under test.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Held while the user decides between income and expense, so the answer
/// step does not re-parse the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    pub raw_text: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Debug)]
pub struct ChatSession {
    history: Vec<ChatTurn>,
    pending: Option<PendingConfirmation>,
    last_activity: DateTime<Utc>,
    max_history: usize,
}

impl ChatSession {
    pub fn new(max_history: usize, now: DateTime<Utc>) -> Self {
        Self {
            history: Vec::new(),
            pending: None,
            last_activity: now,
            max_history,
        }
    }

    pub fn push_turn(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.history.push(ChatTurn {
            speaker,
            text: text.into(),
        });
        if self.history.len() > self.max_history {
            let overflow = self.history.len() - self.max_history;
            self.history.drain(..overflow);
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// True before the user has said anything in this session.
    pub fn is_first_contact(&self) -> bool {
        self.history.is_empty()
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn set_pending(&mut self, pending: PendingConfirmation) {
        self.pending = Some(pending);
    }

    pub fn take_pending(&mut self) -> Option<PendingConfirmation> {
        self.pending.take()
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }
}

/// Sessions keyed by phone number, with idle-TTL eviction.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<String, ChatSession>,
    max_history: usize,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(max_history: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            max_history,
            idle_ttl,
        }
    }

    /// History capped at 20 turns, 30-minute idle TTL.
    pub fn with_defaults() -> Self {
        Self::new(20, Duration::minutes(30))
    }

    /// Fetch-or-create the session for `key`, evicting idle sessions
    /// first and touching the activity timestamp.
    pub fn session_mut(&mut self, key: &str, now: DateTime<Utc>) -> &mut ChatSession {
        self.evict_idle(now);
        let session = self
            .sessions
            .entry(key.to_string())
            .or_insert_with(|| ChatSession::new(self.max_history, now));
        session.touch(now);
        session
    }

    pub fn evict_idle(&mut self, now: DateTime<Utc>) {
        let ttl = self.idle_ttl;
        self.sessions.retain(|key, session| {
            let keep = now - session.last_activity() <= ttl;
            if !keep {
                debug!(key = %key, "evicting idle chat session");
            }
            keep
        });
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
