use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ChatMessage, Session},
};

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

struct Inner {
    sessions: HashMap<Uuid, Session>,
}

/// In-memory registry of client sessions
///
/// Replaces ambient UI session storage: handlers receive a session id and
/// look the context up here. Sessions are not persisted. A session idle for
/// longer than the TTL counts as gone and is evicted on the next login.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                sessions: HashMap::new(),
            })),
            ttl,
        }
    }

    /// Opens a fresh session for `user_id`
    pub async fn open(&self, user_id: i64) -> Session {
        let session = Session::new(user_id);
        let mut inner = self.inner.write().await;
        self.evict_expired(&mut inner);
        inner.sessions.insert(session.id, session.clone());
        tracing::info!(
            session_id = %session.id,
            user_id,
            active = inner.sessions.len(),
            "Session opened"
        );
        session
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Session> {
        let now = Utc::now();
        self.inner
            .read()
            .await
            .sessions
            .get(&id)
            .filter(|session| !session.is_expired(self.ttl, now))
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Appends a user message and the assistant's reply
    pub async fn record_exchange(&self, id: Uuid, message: &str, reply: &str) -> AppResult<()> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&id)
            .filter(|session| !session.is_expired(self.ttl, now))
            .ok_or_else(|| not_found(id))?;
        session.messages.push(ChatMessage::user(message));
        session.messages.push(ChatMessage::assistant(reply));
        session.last_active_at = now;
        Ok(())
    }

    pub async fn messages(&self, id: Uuid) -> AppResult<Vec<ChatMessage>> {
        Ok(self.get(id).await?.messages)
    }

    /// Ends a session; its id is unknown afterwards
    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        let removed = self.inner.write().await.sessions.remove(&id);
        match removed {
            Some(session) if !session.is_expired(self.ttl, Utc::now()) => {
                tracing::info!(session_id = %id, user_id = session.user_id, "Session closed");
                Ok(())
            }
            _ => Err(not_found(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn evict_expired(&self, inner: &mut Inner) {
        let now = Utc::now();
        let before = inner.sessions.len();
        inner
            .sessions
            .retain(|_, session| !session.is_expired(self.ttl, now));

        let evicted = before - inner.sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted expired sessions");
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {} does not exist", id))
}
