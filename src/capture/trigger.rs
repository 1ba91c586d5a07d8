use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::annotate::AnnotationPipeline;
use crate::device::{ButtonEvent, DeviceSession, PressType};
use crate::store::{CapturedPhoto, PhotoStore, StreamingStore};

/// Shown on the device display right before a manual capture
const CAPTURE_NOTICE: &str = "Button pressed, about to take photo";

/// Timing knobs for the capture trigger
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Minimum interval between automatic captures
    pub cooldown: Duration,
    /// How often the auto-capture ticker checks whether a capture is due
    pub tick_interval: Duration,
    /// How long the pre-capture notice stays on the display
    pub notice_duration: Duration,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(30),
            tick_interval: Duration::from_secs(1),
            notice_duration: Duration::from_millis(4000),
        }
    }
}

/// Reacts to button input and drives per-user automatic captures
pub struct CaptureTrigger {
    config: TriggerConfig,
    photos: Arc<PhotoStore>,
    streaming: Arc<StreamingStore>,
    pipeline: Arc<AnnotationPipeline>,
}

impl CaptureTrigger {
    pub fn new(
        config: TriggerConfig,
        photos: Arc<PhotoStore>,
        streaming: Arc<StreamingStore>,
        pipeline: Arc<AnnotationPipeline>,
    ) -> Self {
        Self {
            config,
            photos,
            streaming,
            pipeline,
        }
    }

    /// Dispatch one button event for a user's live session
    ///
    /// A long press only toggles streaming mode; a short press only takes a
    /// photo. Neither path is allowed to bring the event loop down: failures
    /// are logged and swallowed here.
    pub async fn handle_button(
        &self,
        user_id: &str,
        session: &Arc<dyn DeviceSession>,
        event: ButtonEvent,
    ) {
        info!(
            "Button pressed: {}, type: {:?}",
            event.button_id, event.press_type
        );

        match event.press_type {
            PressType::Long => {
                if let Some(mode) = self.streaming.toggle(user_id).await {
                    info!("Streaming photos for user {} is now {:?}", user_id, mode);
                }
            }
            PressType::Short => {
                if let Err(e) = session
                    .show_notice(CAPTURE_NOTICE, self.config.notice_duration)
                    .await
                {
                    warn!("Failed to show capture notice: {}", e);
                }
                if let Err(e) = self.capture_once(user_id, session).await {
                    error!("Error taking photo: {:#}", e);
                }
            }
        }
    }

    /// Run the button event loop for one session
    ///
    /// Ends when the channel closes (device side went away) or the task is
    /// aborted on session stop.
    pub fn spawn_button_listener(
        self: &Arc<Self>,
        user_id: &str,
        session: Arc<dyn DeviceSession>,
        mut buttons: mpsc::Receiver<ButtonEvent>,
    ) -> JoinHandle<()> {
        let trigger = Arc::clone(self);
        let user_id = user_id.to_string();

        tokio::spawn(async move {
            while let Some(event) = buttons.recv().await {
                trigger.handle_button(&user_id, &session, event).await;
            }
            info!("Button listener finished for user {}", user_id);
        })
    }

    /// Run the automatic capture ticker for one session
    ///
    /// Every tick asks the streaming store whether a capture is due. The
    /// claim advances the cooldown before the camera is awaited, so a slow
    /// capture cannot be doubled up by the next tick; once the round-trip
    /// finishes (either way) the cooldown is rewound so a fast capture does
    /// not delay the next one.
    pub fn spawn_ticker(
        self: &Arc<Self>,
        user_id: &str,
        session: Arc<dyn DeviceSession>,
    ) -> JoinHandle<()> {
        let trigger = Arc::clone(self);
        let user_id = user_id.to_string();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(trigger.config.tick_interval);
            loop {
                interval.tick().await;

                if !trigger
                    .streaming
                    .try_claim_capture(&user_id, trigger.config.cooldown)
                    .await
                {
                    continue;
                }

                if let Err(e) = trigger.capture_once(&user_id, &session).await {
                    error!("Error auto-taking photo for user {}: {:#}", user_id, e);
                }
                trigger.streaming.finish_capture(&user_id).await;
            }
        })
    }

    /// One capture round-trip: request a photo, cache it, hand it to the
    /// annotation pipeline
    async fn capture_once(&self, user_id: &str, session: &Arc<dyn DeviceSession>) -> Result<()> {
        let photo = session
            .request_photo()
            .await
            .context("photo request failed")?;
        info!(
            "Photo taken for user {}, timestamp: {}",
            user_id, photo.timestamp
        );

        let cached = CapturedPhoto::from_device(photo, user_id);
        self.photos.put(cached.clone()).await;

        // Enrichment runs out of band; the capture is already complete.
        let _annotation = self.pipeline.annotate(cached);
        Ok(())
    }
}
