//! Session store: trait + in-memory implementation.
//!
//! Append and truncation happen under one write-lock critical section, so two
//! in-flight requests for the same session cannot interleave mid-truncation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::{Turn, TurnRole};
use crate::MAX_HISTORY_TURNS;

/// Keyed turn-log storage, one log per session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Appends a turn to the session's log, evicting the oldest entries past
    /// [`MAX_HISTORY_TURNS`]. Returns the log length after the append.
    async fn append(
        &self,
        session: Uuid,
        role: TurnRole,
        content: &str,
    ) -> Result<usize, anyhow::Error>;

    /// The session's turns, oldest first. Empty for unknown sessions.
    async fn history(&self, session: Uuid) -> Result<Vec<Turn>, anyhow::Error>;

    /// Drops the session's log.
    async fn clear(&self, session: Uuid) -> Result<(), anyhow::Error>;
}

/// In-memory session store backed by `Arc<RwLock<HashMap>>`.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Vec<Turn>>>>,
}

impl InMemorySessionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently holding history.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(
        &self,
        session: Uuid,
        role: TurnRole,
        content: &str,
    ) -> Result<usize, anyhow::Error> {
        let mut sessions = self.sessions.write().await;
        let log = sessions.entry(session).or_default();
        log.push(Turn::now(role, content));
        if log.len() > MAX_HISTORY_TURNS {
            let overflow = log.len() - MAX_HISTORY_TURNS;
            log.drain(..overflow);
        }
        Ok(log.len())
    }

    async fn history(&self, session: Uuid) -> Result<Vec<Turn>, anyhow::Error> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&session).cloned().unwrap_or_default())
    }

    async fn clear(&self, session: Uuid) -> Result<(), anyhow::Error> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&session);
        Ok(())
    }
}
