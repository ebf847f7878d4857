//! Session Store
//!
//! Trait and in-memory implementation for session storage.
//!
//! Lifecycle spans:
//! - `mcp.session.create` - session creation (new or resumed)
//! - `mcp.session.expire` - idle expiry during cleanup

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{Session, SessionRef};
use crate::types::protocol::Implementation;

/// Statistics about active sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub initialized: usize,
}

/// Session store trait for pluggable storage backends.
pub trait SessionStore: Send + Sync {
    /// Get an existing session or create a new one.
    ///
    /// A hint that names an unknown session creates it under that ID, so
    /// clients reconnecting after a server restart keep their session header.
    fn get_or_create(&self, id_hint: Option<&str>) -> String;

    /// Get a session by ID.
    fn get(&self, id: &str) -> Option<SessionRef<'_>>;

    /// Update the last_seen timestamp.
    fn touch(&self, id: &str);

    /// Mark a session as initialized.
    fn set_initialized(&self, id: &str, client_info: Implementation);

    /// Remove sessions idle for longer than `max_idle`. Returns how many.
    fn cleanup(&self, max_idle: Duration) -> usize;

    /// Remove a specific session. Returns whether it existed.
    fn remove(&self, id: &str) -> bool;

    fn stats(&self) -> SessionStats;
}

/// In-memory session store using DashMap.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_or_create(&self, id_hint: Option<&str>) -> String {
        let (id, is_new) = match id_hint {
            Some(hint) => {
                let is_new = !self.sessions.contains_key(hint);
                self.sessions
                    .entry(hint.to_string())
                    .or_insert_with(|| Session::new(hint.to_string()));
                (hint.to_string(), is_new)
            }
            None => {
                let id = Uuid::new_v4().to_string();
                self.sessions.insert(id.clone(), Session::new(id.clone()));
                (id, true)
            }
        };

        let _span = tracing::info_span!(
            "mcp.session.create",
            mcp.session_id = %id,
            mcp.session.is_new = %is_new,
        )
        .entered();

        if is_new {
            tracing::info!("Created new session");
        } else {
            tracing::debug!("Resumed existing session");
        }

        id
    }

    fn get(&self, id: &str) -> Option<SessionRef<'_>> {
        self.sessions.get(id)
    }

    fn touch(&self, id: &str) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.touch();
        }
    }

    fn set_initialized(&self, id: &str, client_info: Implementation) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            tracing::info!(
                session_id = %id,
                client_name = %client_info.name,
                client_version = %client_info.version,
                "Session initialized"
            );
            session.set_initialized(client_info);
        }
    }

    fn cleanup(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|id, session| {
            let keep = session.idle_duration() <= max_idle;
            if !keep {
                let _span =
                    tracing::info_span!("mcp.session.expire", mcp.session_id = %id).entered();
                tracing::info!("Removed stale session");
            }
            keep
        });
        let removed = before.saturating_sub(self.sessions.len());

        if removed > 0 {
            tracing::info!(
                removed = removed,
                remaining = self.sessions.len(),
                "Session cleanup completed"
            );
        }

        removed
    }

    fn remove(&self, id: &str) -> bool {
        let existed = self.sessions.remove(id).is_some();
        if existed {
            tracing::info!(session_id = %id, "Session removed");
        }
        existed
    }

    fn stats(&self) -> SessionStats {
        let initialized = self
            .sessions
            .iter()
            .filter(|entry| entry.value().initialized)
            .count();

        SessionStats {
            total: self.sessions.len(),
            initialized,
        }
    }
}

/// Spawn a background task that periodically removes idle sessions.
pub fn spawn_cleanup_task(
    store: Arc<dyn SessionStore>,
    interval: Duration,
    max_idle: Duration,
    cancel: tokio_util::sync::CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Session cleanup task shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    store.cleanup(max_idle);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let store = InMemorySessionStore::new();
        let id = store.get_or_create(None);
        assert!(!id.is_empty());
        assert_eq!(
            store.stats(),
            SessionStats {
                total: 1,
                initialized: 0
            }
        );
    }

    #[test]
    fn test_session_with_hint_is_resumed() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get_or_create(Some("abc")), "abc");
        assert_eq!(store.get_or_create(Some("abc")), "abc");
        assert_eq!(store.stats().total, 1);
    }

    #[test]
    fn test_session_initialize() {
        let store = InMemorySessionStore::new();
        let id = store.get_or_create(None);

        store.set_initialized(&id, Implementation::new("agent", "1.0"));

        let session = store.get(&id).unwrap();
        assert!(session.initialized);
        assert_eq!(session.client_info.as_ref().unwrap().name, "agent");
    }

    #[test]
    fn test_cleanup_removes_idle_sessions() {
        let store = InMemorySessionStore::new();
        let _id = store.get_or_create(None);
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(store.cleanup(Duration::ZERO), 1);
        assert_eq!(store.stats().total, 0);
    }

    #[test]
    fn test_cleanup_keeps_recent_sessions() {
        let store = InMemorySessionStore::new();
        let _id = store.get_or_create(None);

        assert_eq!(store.cleanup(Duration::from_secs(3600)), 0);
        assert_eq!(store.stats().total, 1);
    }

    #[test]
    fn test_remove() {
        let store = InMemorySessionStore::new();
        let id = store.get_or_create(None);
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
    }
}
