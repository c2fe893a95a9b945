use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::task;
use tokio::time::{sleep, Duration};
use uuid::Uuid;

use crate::composer::Narrative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Narrative of one uploaded timetable. Replaced wholesale on re-upload.
pub struct Session {
    narrative: Narrative,
    events: usize,
    in_flight: Mutex<()>,
}

impl Session {
    pub fn new(narrative: Narrative, events: usize) -> Self {
        Self {
            narrative,
            events,
            in_flight: Mutex::new(()),
        }
    }

    pub fn narrative(&self) -> &Narrative {
        &self.narrative
    }

    pub fn events(&self) -> usize {
        self.events
    }

    /// Claims the session for one question; `None` while another is pending.
    pub fn try_begin(&self) -> Option<MutexGuard<'_, ()>> {
        self.in_flight.try_lock().ok()
    }
}

pub struct Config {
    pub ttl: Duration,
}

pub struct Sessions {
    inner: RwLock<HashMap<SessionId, Arc<Session>>>,
    ttl: Duration,
}

impl Sessions {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            ttl: config.ttl,
            inner: Default::default(),
        })
    }

    /// Stores `session` under `id`, replacing any previous one, and schedules
    /// its expiry. A later insert under the same id is not evicted by this timer.
    pub async fn insert(self: Arc<Self>, id: SessionId, session: Session) -> Arc<Session> {
        let session = Arc::new(session);

        self.inner.write().await.insert(id, Arc::clone(&session));

        let sessions = Arc::clone(&self);
        let expiring = Arc::downgrade(&session);
        task::spawn(async move {
            sleep(sessions.ttl).await;

            let mut inner = sessions.inner.write().await;
            let current = inner
                .get(&id)
                .is_some_and(|stored| expiring.upgrade().is_some_and(|s| Arc::ptr_eq(stored, &s)));

            if current {
                inner.remove(&id);
                tracing::debug!(session = %id, "session expired");
            }
        });

        session
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.inner.read().await.get(id).map(Arc::clone)
    }

    pub async fn remove(&self, id: &SessionId) -> bool {
        self.inner.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
