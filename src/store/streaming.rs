use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Auto-capture mode for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// No automatic captures
    Idle,
    /// The ticker fires captures on a cooldown
    Streaming,
}

impl StreamMode {
    /// The opposite mode; a long press flips between the two
    pub fn toggled(self) -> Self {
        match self {
            Self::Idle => Self::Streaming,
            Self::Streaming => Self::Idle,
        }
    }

    pub fn is_streaming(self) -> bool {
        matches!(self, Self::Streaming)
    }
}

/// Per-user streaming record
#[derive(Debug, Clone)]
pub struct StreamingState {
    pub mode: StreamMode,
    /// Earliest instant the ticker may issue the next automatic capture
    pub next_capture_at: Instant,
}

impl StreamingState {
    fn new() -> Self {
        Self {
            mode: StreamMode::Idle,
            next_capture_at: Instant::now(),
        }
    }
}

/// Per-user streaming records, created on session start and removed on stop
///
/// The claim/finish pair below is what keeps automatic captures from
/// overlapping: `try_claim_capture` advances the cooldown under the user's
/// slot lock before the caller awaits the (possibly slow) camera, and
/// `finish_capture` rewinds it once the round-trip is over so a fast capture
/// does not stall the next tick for the full cooldown.
pub struct StreamingStore {
    states: RwLock<HashMap<String, Arc<Mutex<StreamingState>>>>,
}

impl StreamingStore {
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Create the user's record in its initial state: Idle, no cooldown
    ///
    /// Called on session start; overwrites any record left by a previous
    /// connection, so a reconnect always starts Idle.
    pub async fn init(&self, user_id: &str) {
        self.states.write().await.insert(
            user_id.to_string(),
            Arc::new(Mutex::new(StreamingState::new())),
        );
    }

    /// Drop the user's record entirely (session stop)
    pub async fn remove(&self, user_id: &str) {
        self.states.write().await.remove(user_id);
    }

    /// Flip the user's mode, returning the new one
    ///
    /// Returns `None` when the user has no record, i.e. no active session.
    pub async fn toggle(&self, user_id: &str) -> Option<StreamMode> {
        let slot = self.slot(user_id).await?;
        let mut state = slot.lock().await;
        state.mode = state.mode.toggled();
        Some(state.mode)
    }

    /// Current mode, if the user has an active record
    pub async fn mode(&self, user_id: &str) -> Option<StreamMode> {
        let slot = self.slot(user_id).await?;
        let mode = slot.lock().await.mode;
        Some(mode)
    }

    /// Claim the right to issue one automatic capture
    ///
    /// Returns true only if the user is streaming and the cooldown has
    /// passed; in that case the next-allowed instant is pushed out by
    /// `cooldown` in the same critical section, so a concurrent tick cannot
    /// claim again while this capture is still in flight.
    pub async fn try_claim_capture(&self, user_id: &str, cooldown: Duration) -> bool {
        let Some(slot) = self.slot(user_id).await else {
            return false;
        };
        let mut state = slot.lock().await;
        if !state.mode.is_streaming() || Instant::now() < state.next_capture_at {
            return false;
        }
        state.next_capture_at = Instant::now() + cooldown;
        true
    }

    /// Mark a claimed capture finished (success or failure)
    ///
    /// Rewinds the next-allowed instant to now so the next tick may fire
    /// without waiting out the rest of the cooldown.
    pub async fn finish_capture(&self, user_id: &str) {
        if let Some(slot) = self.slot(user_id).await {
            slot.lock().await.next_capture_at = Instant::now();
        }
    }

    async fn slot(&self, user_id: &str) -> Option<Arc<Mutex<StreamingState>>> {
        self.states.read().await.get(user_id).cloned()
    }
}

impl Default for StreamingStore {
    fn default() -> Self {
        Self::new()
    }
}
