use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::device::DeviceSession;

/// Live device session per user
///
/// The registry is the only path by which server-initiated output (speech,
/// annotation playback) reaches a device. It holds a shared handle for the
/// duration of the session; one concurrent session per user, a new
/// registration replaces the old handle.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<dyn DeviceSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Track the live session for a user, replacing any prior handle
    pub async fn register(&self, user_id: &str, session: Arc<dyn DeviceSession>) {
        self.sessions
            .write()
            .await
            .insert(user_id.to_string(), session);
    }

    /// The user's live session, if one is connected
    pub async fn lookup(&self, user_id: &str) -> Option<Arc<dyn DeviceSession>> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Forget the user's session so `lookup` reports "no active session"
    pub async fn remove(&self, user_id: &str) -> Option<Arc<dyn DeviceSession>> {
        self.sessions.write().await.remove(user_id)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
