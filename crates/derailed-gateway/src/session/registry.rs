//! Session registry
//!
//! Keyed start/lookup/stop of session actors, backed by a sharded map so
//! distinct keys never contend.

use std::fmt;

use dashmap::DashMap;
use derailed_core::Snowflake;
use serde_json::Value;

use super::{SessionHandle, SessionInit};

/// Registry namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Keyed by session id
    Session,
    /// Keyed by user id
    User,
}

/// Registry key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub kind: SessionKind,
    pub key: String,
}

impl SessionKey {
    pub fn new(kind: SessionKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.kind, self.key)
    }
}

/// Tracks every running session actor
#[derive(Default)]
pub struct SessionRegistry {
    entries: DashMap<SessionKey, SessionHandle>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an actor under `key`, stopping whatever was registered there
    pub fn start(&self, kind: SessionKind, key: impl Into<String>, init: SessionInit) -> SessionHandle {
        let key = SessionKey::new(kind, key);
        let handle = SessionHandle::spawn(init);

        if let Some(previous) = self.entries.insert(key.clone(), handle.clone()) {
            tracing::debug!(key = %key, "Replacing registered session actor");
            previous.stop();
        }

        tracing::debug!(key = %key, "Session actor registered");
        handle
    }

    /// Stop and remove the actor under `key`; false if nothing was there
    pub fn stop(&self, kind: SessionKind, key: &str) -> bool {
        let key = SessionKey::new(kind, key);
        match self.entries.remove(&key) {
            Some((_, handle)) => {
                handle.stop();
                tracing::debug!(key = %key, "Session actor stopped");
                true
            }
            None => false,
        }
    }

    pub fn get(&self, kind: SessionKind, key: &str) -> Option<SessionHandle> {
        self.entries
            .get(&SessionKey::new(kind, key))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, kind: SessionKind, key: &str) -> bool {
        self.entries.contains_key(&SessionKey::new(kind, key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of one kind
    pub fn count(&self, kind: SessionKind) -> usize {
        self.entries.iter().filter(|e| e.key().kind == kind).count()
    }

    /// Session actors belonging to `user_id`
    pub fn sessions_for_user(&self, user_id: Snowflake) -> Vec<SessionHandle> {
        self.sessions_where(|h| h.user_id() == user_id)
    }

    /// Queue a dispatch on every session of `user_id`
    pub fn dispatch_to_user(&self, user_id: Snowflake, t: &str, d: &Value) -> usize {
        let sent = self
            .sessions_for_user(user_id)
            .iter()
            .filter(|h| h.dispatch(t, d.clone()))
            .count();

        tracing::trace!(user_id = %user_id, event = t, sent, "Dispatched to user sessions");
        sent
    }

    /// Queue a dispatch on every session whose user is in `guild_id`
    pub fn dispatch_to_guild(&self, guild_id: Snowflake, t: &str, d: &Value) -> usize {
        let sent = self
            .sessions_where(|h| h.in_guild(guild_id))
            .iter()
            .filter(|h| h.dispatch(t, d.clone()))
            .count();

        tracing::trace!(guild_id = %guild_id, event = t, sent, "Dispatched to guild sessions");
        sent
    }

    /// Signal every session of `user_id` that the account was deleted
    pub async fn identity_deleted(&self, user_id: Snowflake) -> usize {
        let mut notified = 0;
        for handle in self.sessions_for_user(user_id) {
            if handle.identity_deleted().await {
                notified += 1;
            }
        }

        tracing::info!(user_id = %user_id, notified, "Identity deletion signalled");
        notified
    }

    fn sessions_where(&self, pred: impl Fn(&SessionHandle) -> bool) -> Vec<SessionHandle> {
        self.entries
            .iter()
            .filter(|e| e.key().kind == SessionKind::Session && pred(e.value()))
            .map(|e| e.value().clone())
            .collect()
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.count(SessionKind::Session))
            .field("users", &self.count(SessionKind::User))
            .finish()
    }
}
