use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use super::registry::SessionRegistry;
use crate::capture::CaptureTrigger;
use crate::device::DeviceSession;
use crate::store::StreamingStore;

/// Background tasks owned by one live session
struct SessionTasks {
    buttons: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

impl SessionTasks {
    fn abort(&self) {
        self.buttons.abort();
        self.ticker.abort();
    }
}

/// Session lifecycle entry points for the hosting platform layer
///
/// The platform transport calls `start_session` when a device connects and
/// `stop_session` when it disconnects. Starting a session registers the
/// handle, creates the streaming record, and spawns the per-user button
/// listener and auto-capture ticker; stopping tears all of it down.
pub struct SessionCoordinator {
    registry: Arc<SessionRegistry>,
    streaming: Arc<StreamingStore>,
    trigger: Arc<CaptureTrigger>,
    tasks: Mutex<HashMap<String, SessionTasks>>,
}

impl SessionCoordinator {
    pub fn new(
        registry: Arc<SessionRegistry>,
        streaming: Arc<StreamingStore>,
        trigger: Arc<CaptureTrigger>,
    ) -> Self {
        Self {
            registry,
            streaming,
            trigger,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Bring a freshly connected session online
    ///
    /// Fails only if the session refuses a button subscription; in that case
    /// nothing is left registered.
    pub async fn start_session(&self, user_id: &str, session: Arc<dyn DeviceSession>) -> Result<()> {
        info!("Session started for user {}", user_id);

        let buttons = session
            .subscribe_buttons()
            .await
            .context("failed to subscribe to button events")?;

        self.registry.register(user_id, Arc::clone(&session)).await;
        self.streaming.init(user_id).await;

        let tasks = SessionTasks {
            buttons: self
                .trigger
                .spawn_button_listener(user_id, Arc::clone(&session), buttons),
            ticker: self.trigger.spawn_ticker(user_id, session),
        };

        // One session per user: replacing an old entry kills its tasks too
        if let Some(old) = self.tasks.lock().await.insert(user_id.to_string(), tasks) {
            old.abort();
        }

        Ok(())
    }

    /// Tear a session down after the device disconnects
    ///
    /// Stops the per-user tasks, drops the streaming record (a reconnect
    /// always starts Idle) and unregisters the handle. In-flight annotation
    /// work is left to finish; its result is discarded by the photo store's
    /// staleness check if it arrives too late to matter.
    pub async fn stop_session(&self, user_id: &str, reason: &str) {
        info!("Session stopped for user {}, reason: {}", user_id, reason);

        if let Some(tasks) = self.tasks.lock().await.remove(user_id) {
            tasks.abort();
        }
        self.streaming.remove(user_id).await;
        self.registry.remove(user_id).await;
    }
}
