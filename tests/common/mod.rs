//! Shared test fixtures
#![allow(dead_code)]

use anyhow::{bail, Context, Result};
use chrono::Utc;
use glimpse_relay::{ButtonEvent, DeviceSession, PhotoData, PressType};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Scripted device session that records everything the relay does to it
///
/// Photos get deterministic ids ("req-1", "req-2", ...) so tests can assert
/// on specific captures. `press` injects button events the way real glasses
/// would deliver them.
pub struct FakeSession {
    fail_photos: AtomicBool,
    capture_delay: Duration,
    captures: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    spoken: Mutex<Vec<String>>,
    played: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
    buttons_tx: mpsc::Sender<ButtonEvent>,
    buttons_rx: Mutex<Option<mpsc::Receiver<ButtonEvent>>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::with_capture_delay(Duration::ZERO)
    }

    /// Session whose camera takes `delay` to deliver each photo
    pub fn with_capture_delay(delay: Duration) -> Self {
        let (buttons_tx, buttons_rx) = mpsc::channel(16);
        Self {
            fail_photos: AtomicBool::new(false),
            capture_delay: delay,
            captures: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            spoken: Mutex::new(Vec::new()),
            played: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            buttons_tx,
            buttons_rx: Mutex::new(Some(buttons_rx)),
        }
    }

    /// Make every subsequent photo request fail like a camera error
    pub fn set_fail_photos(&self, fail: bool) {
        self.fail_photos.store(fail, Ordering::SeqCst);
    }

    /// Inject a button press
    pub async fn press(&self, press_type: PressType) -> Result<()> {
        self.buttons_tx
            .send(ButtonEvent {
                button_id: "camera".to_string(),
                press_type,
            })
            .await
            .context("fake session not listening for buttons")
    }

    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    /// Highest number of photo requests ever awaited concurrently
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub async fn spoken(&self) -> Vec<String> {
        self.spoken.lock().await.clone()
    }

    pub async fn played(&self) -> Vec<String> {
        self.played.lock().await.clone()
    }

    pub async fn notices(&self) -> Vec<String> {
        self.notices.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl DeviceSession for FakeSession {
    async fn request_photo(&self) -> Result<PhotoData> {
        if self.fail_photos.load(Ordering::SeqCst) {
            bail!("camera error");
        }

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if !self.capture_delay.is_zero() {
            tokio::time::sleep(self.capture_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let n = self.captures.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PhotoData {
            request_id: format!("req-{}", n),
            buffer: vec![0xFF, 0xD8, n as u8],
            timestamp: Utc::now(),
            mime_type: "image/jpeg".to_string(),
            filename: format!("photo_{}.jpg", n),
            size: 3,
        })
    }

    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().await.push(text.to_string());
        Ok(())
    }

    async fn play_audio(&self, url: &str) -> Result<()> {
        self.played.lock().await.push(url.to_string());
        Ok(())
    }

    async fn show_notice(&self, text: &str, _duration: Duration) -> Result<()> {
        self.notices.lock().await.push(text.to_string());
        Ok(())
    }

    async fn subscribe_buttons(&self) -> Result<mpsc::Receiver<ButtonEvent>> {
        self.buttons_rx
            .lock()
            .await
            .take()
            .context("buttons already subscribed")
    }
}

/// A minimal cache entry for store-level tests
pub fn test_photo(user_id: &str, request_id: &str) -> glimpse_relay::CapturedPhoto {
    glimpse_relay::CapturedPhoto {
        request_id: request_id.to_string(),
        data: vec![1, 2, 3],
        captured_at: Utc::now(),
        user_id: user_id.to_string(),
        mime_type: "image/jpeg".to_string(),
        filename: format!("{}.jpg", request_id),
        size: 3,
        audio: None,
    }
}
