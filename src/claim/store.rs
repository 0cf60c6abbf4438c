//! In-memory registry of open claim sessions, keyed by session id

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::session::ClaimSession;
use crate::domain::{FoundItem, Identity};

pub struct ClaimSessionStore {
    sessions: Mutex<HashMap<Uuid, ClaimSession>>,
    idle_timeout: Duration,
}

impl ClaimSessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Open a session for `viewer` on `item`. Idle sessions are pruned first.
    pub async fn open(&self, item: FoundItem, viewer: &Identity) -> Uuid {
        let mut sessions = self.sessions.lock().await;
        prune_idle(&mut sessions, self.idle_timeout, Instant::now());

        let id = Uuid::new_v4();
        sessions.insert(id, ClaimSession::open(item, viewer));
        id
    }

    /// Run `f` against the session, or return `None` if it is unknown or idle
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ClaimSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.lock().await;
        prune_idle(&mut sessions, self.idle_timeout, Instant::now());
        sessions.get_mut(&id).map(|session| {
            session.touch();
            f(session)
        })
    }

    /// Drop the session. Late notification warnings for it are discarded.
    pub async fn close(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn prune_idle(sessions: &mut HashMap<Uuid, ClaimSession>, idle: Duration, now: Instant) {
    let before = sessions.len();
    sessions.retain(|_, s| now.saturating_duration_since(s.last_seen()) < idle);
    let pruned = before - sessions.len();
    if pruned > 0 {
        log::debug!("Pruned {} idle claim sessions", pruned);
    }
}
