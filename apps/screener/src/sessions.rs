use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::models::candidate::ResultTable;

/// One session's accumulated results.
///
/// The async lock is held for a whole analyze call, so two requests against
/// the same session run one after the other and neither loses rows.
pub type SessionTable = Arc<AsyncMutex<ResultTable>>;

struct SessionEntry {
    table: SessionTable,
    last_used: Instant,
}

/// In-memory session tables keyed by session id. Nothing outlives the process.
///
/// Sessions untouched for longer than `idle_ttl` are dropped the next time a
/// session is opened.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Opens a session with an empty table.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_used) <= self.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {evicted} idle session(s)");
        }

        sessions.insert(
            id,
            SessionEntry {
                table: Arc::new(AsyncMutex::new(ResultTable::new())),
                last_used: now,
            },
        );
        id
    }

    /// Looks up a session and marks it as used.
    pub fn get(&self, id: Uuid) -> Option<SessionTable> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions.get_mut(&id)?;
        entry.last_used = Instant::now();
        Some(entry.table.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
