//! Session Management
//!
//! Tracks `Mcp-Session-Id` sessions for the Streamable HTTP transport.
//! Sessions record who connected and when; they never hold credentials,
//! which are resolved per request.

mod store;

pub use store::{spawn_cleanup_task, InMemorySessionStore, SessionStats, SessionStore};

use std::time::Instant;

use crate::types::protocol::Implementation;

/// A reference to a session (from DashMap).
pub type SessionRef<'a> = dashmap::mapref::one::Ref<'a, String, Session>;

/// An MCP session.
#[derive(Debug)]
pub struct Session {
    /// Unique session identifier.
    pub id: String,

    /// When the session was created.
    pub created_at: Instant,

    /// Last activity timestamp.
    pub last_seen: Instant,

    /// Client implementation info (set after initialize).
    pub client_info: Option<Implementation>,

    /// Whether the session has completed initialization.
    pub initialized: bool,
}

impl Session {
    pub fn new(id: String) -> Self {
        let now = Instant::now();
        Self {
            id,
            created_at: now,
            last_seen: now,
            client_info: None,
            initialized: false,
        }
    }

    /// Time since last activity.
    pub fn idle_duration(&self) -> std::time::Duration {
        self.last_seen.elapsed()
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn set_initialized(&mut self, client_info: Implementation) {
        self.initialized = true;
        self.client_info = Some(client_info);
        self.touch();
    }
}
