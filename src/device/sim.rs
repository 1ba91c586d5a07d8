use anyhow::{Context, Result};
use chrono::Utc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::info;

use super::session::{ButtonEvent, DeviceSession, PhotoData, PressType};

/// 1x1 transparent PNG, enough for a camera that only has to produce bytes
const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Scripted device session for local development without glasses hardware
///
/// The camera returns a fixed sample image, speech and playback are logged,
/// and button presses are injected with [`SimulatedSession::press`]. Used by
/// the `--simulate` flag of the server binary and by the demo example.
pub struct SimulatedSession {
    buttons_tx: mpsc::Sender<ButtonEvent>,
    buttons_rx: Mutex<Option<mpsc::Receiver<ButtonEvent>>>,
}

impl SimulatedSession {
    pub fn new() -> Self {
        let (buttons_tx, buttons_rx) = mpsc::channel(16);
        Self {
            buttons_tx,
            buttons_rx: Mutex::new(Some(buttons_rx)),
        }
    }

    /// Inject a button press as if the wearer had pressed the camera button
    pub async fn press(&self, press_type: PressType) -> Result<()> {
        self.buttons_tx
            .send(ButtonEvent {
                button_id: "camera".to_string(),
                press_type,
            })
            .await
            .context("simulated session is no longer listening for buttons")
    }
}

impl Default for SimulatedSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DeviceSession for SimulatedSession {
    async fn request_photo(&self) -> Result<PhotoData> {
        let timestamp = Utc::now();
        let request_id = format!("sim-{}", uuid::Uuid::new_v4());
        info!("Simulated camera produced photo {}", request_id);

        Ok(PhotoData {
            request_id,
            buffer: SAMPLE_PNG.to_vec(),
            timestamp,
            mime_type: "image/png".to_string(),
            filename: format!("photo_{}.png", timestamp.timestamp_millis()),
            size: SAMPLE_PNG.len(),
        })
    }

    async fn speak(&self, text: &str) -> Result<()> {
        info!("Simulated speech: {}", text);
        Ok(())
    }

    async fn play_audio(&self, url: &str) -> Result<()> {
        info!("Simulated playback of {}", url);
        Ok(())
    }

    async fn show_notice(&self, text: &str, duration: Duration) -> Result<()> {
        info!("Simulated notice ({}ms): {}", duration.as_millis(), text);
        Ok(())
    }

    async fn subscribe_buttons(&self) -> Result<mpsc::Receiver<ButtonEvent>> {
        self.buttons_rx
            .lock()
            .await
            .take()
            .context("button events already subscribed")
    }
}
