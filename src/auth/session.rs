// src/auth/session.rs
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

const DEFAULT_TTL_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

/// In-memory bearer tokens for logged-in users.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        let ttl = Duration::try_minutes(ttl_minutes)
            .filter(|ttl| *ttl > Duration::zero())
            .unwrap_or_else(|| Duration::minutes(DEFAULT_TTL_MINUTES));
        Self::with_ttl(ttl)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        now - session.issued_at >= self.ttl
    }

    /// Starts a session and returns its token.
    pub async fn issue(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            issued_at: Utc::now(),
        };
        self.sessions.lock().await.insert(token.clone(), session);
        info!("Started session for '{}'", username);
        token
    }

    /// Returns the username behind a live token. Expired tokens are dropped.
    pub async fn resolve(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get(token)?;
        if self.is_expired(session, Utc::now()) {
            debug!("Session for '{}' expired", session.username);
            sessions.remove(token);
            return None;
        }
        Some(session.username.clone())
    }

    /// Ends a session. Returns whether the token was live.
    pub async fn revoke(&self, token: &str) -> bool {
        match self.sessions.lock().await.remove(token) {
            Some(session) => {
                info!("Ended session for '{}'", session.username);
                true
            }
            None => false,
        }
    }

    /// Drops every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

pub type SharedSessionStore = Arc<SessionStore>;

pub fn create_session_store(ttl_minutes: i64) -> SharedSessionStore {
    Arc::new(SessionStore::new(ttl_minutes))
}
