use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;

/// How a hardware button was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressType {
    /// Quick tap: triggers a single manual capture
    Short,
    /// Press-and-hold: toggles auto-capture streaming
    Long,
}

/// A button input event delivered by a device session
#[derive(Debug, Clone)]
pub struct ButtonEvent {
    /// Which physical button was pressed (e.g. "camera")
    pub button_id: String,
    /// Short or long press
    pub press_type: PressType,
}

/// One photo produced by the device camera
#[derive(Debug, Clone)]
pub struct PhotoData {
    /// Unique id for this capture, assigned by the device
    pub request_id: String,
    /// Raw image bytes
    pub buffer: Vec<u8>,
    /// When the photo was taken
    pub timestamp: DateTime<Utc>,
    /// MIME type of the image (e.g. "image/jpeg")
    pub mime_type: String,
    /// Filename suggested by the device (e.g. "photo_1718123456.jpg")
    pub filename: String,
    /// Image size in bytes
    pub size: usize,
}

/// Live connection to one user's wearable device
///
/// Implementations wrap the platform transport. All methods may fail if the
/// device has disconnected; callers are expected to log and move on rather
/// than retry.
#[async_trait::async_trait]
pub trait DeviceSession: Send + Sync {
    /// Ask the device camera for one photo
    ///
    /// Resolves when the device delivers the image or reports a camera
    /// error. There is no timeout here; the call suspends cooperatively and
    /// never blocks other sessions.
    async fn request_photo(&self) -> Result<PhotoData>;

    /// Speak text through the device speaker
    async fn speak(&self, text: &str) -> Result<()>;

    /// Play a remote audio file (by URL) through the device speaker
    async fn play_audio(&self, url: &str) -> Result<()>;

    /// Show a transient text notice on the display
    async fn show_notice(&self, text: &str, duration: Duration) -> Result<()>;

    /// Subscribe to hardware button events
    ///
    /// Returns a channel receiver that yields one `ButtonEvent` per press.
    /// The channel closes when the session ends. A session supports a single
    /// subscriber; subsequent calls fail.
    async fn subscribe_buttons(&self) -> Result<mpsc::Receiver<ButtonEvent>>;
}
