//! In-memory chat sessions. Each session owns its candidate, transcript and
//! conversation handler; only the provider client is shared.
//!
//! Sessions idle past the TTL are swept whenever a new one is created and are
//! treated as gone on lookup. The registry never holds more than `max_sessions`:
//! the least recently used session makes room for a new one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::llm_client::ProviderClient;
use crate::models::candidate::CandidateProfile;
use crate::models::conversation::ConversationTurn;
use crate::screening::conversation::ConversationHandler;

pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;
/// Oldest turns are dropped beyond this length.
pub const MAX_TRANSCRIPT_TURNS: usize = 200;

pub struct Session {
    pub candidate: CandidateProfile,
    pub messages: Vec<ConversationTurn>,
    pub conversation: ConversationHandler,
}

impl Session {
    fn new(provider: Arc<ProviderClient>) -> Self {
        Self {
            candidate: CandidateProfile::blank(Utc::now()),
            messages: Vec::new(),
            conversation: ConversationHandler::new(provider),
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(ConversationTurn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(ConversationTurn::assistant(text));
    }

    fn push(&mut self, turn: ConversationTurn) {
        self.messages.push(turn);
        if self.messages.len() > MAX_TRANSCRIPT_TURNS {
            let excess = self.messages.len() - MAX_TRANSCRIPT_TURNS;
            self.messages.drain(..excess);
        }
    }
}

struct SessionEntry {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

/// Session registry. A session's mutex is held for a whole interaction, so
/// requests against one session run one at a time.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn create(&self, provider: Arc<ProviderClient>) -> Uuid {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            debug!("Evicted {expired} idle sessions");
        }

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            warn!("Session limit ({}) reached, evicted session {oldest}", self.max_sessions);
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(Session::new(provider))),
                last_seen: now,
            },
        );
        id
    }

    /// Returns a live session and marks it as seen. An expired session is removed
    /// and reported missing.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<Session>>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let entry = sessions.get_mut(&id)?;
        if now.duration_since(entry.last_seen) >= self.idle_ttl {
            sessions.remove(&id);
            debug!("Session {id} expired");
            return None;
        }
        entry.last_seen = now;
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) {
        self.sessions.write().await.remove(&id);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
