use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::device::PhotoData;

/// One captured photo and its (optional) derived audio
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    /// Capture id assigned by the device, correlates trigger and annotation
    pub request_id: String,
    /// Raw image bytes
    pub data: Vec<u8>,
    /// When the photo was taken
    pub captured_at: DateTime<Utc>,
    /// User the photo belongs to
    pub user_id: String,
    /// MIME type of the image
    pub mime_type: String,
    /// Filename the device suggested; also keys the annotation artifact
    pub filename: String,
    /// Image size in bytes
    pub size: usize,
    /// Derived speech audio (MP3), attached once annotation completes.
    /// May never arrive.
    pub audio: Option<Vec<u8>>,
}

impl CapturedPhoto {
    /// Build a cache entry from a device photo
    pub fn from_device(photo: PhotoData, user_id: &str) -> Self {
        Self {
            request_id: photo.request_id,
            data: photo.buffer,
            captured_at: photo.timestamp,
            user_id: user_id.to_string(),
            mime_type: photo.mime_type,
            filename: photo.filename,
            size: photo.size,
            audio: None,
        }
    }
}

type PhotoSlot = Arc<Mutex<Option<CapturedPhoto>>>;

/// Keyed cache of the most recent photo per user
///
/// Holds exactly one entry per user: a new capture overwrites the previous
/// one regardless of whether its annotation ever finished. The outer map is
/// locked only to look up or create a user's slot; all entry mutation
/// happens under the slot's own lock, so users never block each other.
pub struct PhotoStore {
    slots: RwLock<HashMap<String, PhotoSlot>>,
    /// Parallel freshness index: capture time in epoch millis per user
    latest_ms: RwLock<HashMap<String, i64>>,
}

impl PhotoStore {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            latest_ms: RwLock::new(HashMap::new()),
        }
    }

    /// Cache a photo, replacing whatever the user had before
    pub async fn put(&self, photo: CapturedPhoto) {
        let user_id = photo.user_id.clone();
        let captured_ms = photo.captured_at.timestamp_millis();

        let slot = self.slot(&user_id).await;
        *slot.lock().await = Some(photo);
        self.latest_ms
            .write()
            .await
            .insert(user_id.clone(), captured_ms);

        info!("Photo cached for user {}", user_id);
    }

    /// Fetch the user's current photo, if any
    pub async fn get(&self, user_id: &str) -> Option<CapturedPhoto> {
        let slot = self.slots.read().await.get(user_id).cloned()?;
        let entry = slot.lock().await;
        entry.clone()
    }

    /// Attach annotation audio to the user's current photo
    ///
    /// Succeeds only while the stored entry still carries `request_id`; a
    /// result for an already-superseded photo is silently discarded. This is
    /// the race-safety rule that gives last-capture-wins semantics no matter
    /// when annotation results arrive.
    pub async fn attach_audio(&self, user_id: &str, request_id: &str, audio: Vec<u8>) -> bool {
        let Some(slot) = self.slots.read().await.get(user_id).cloned() else {
            return false;
        };
        let mut entry = slot.lock().await;
        match entry.as_mut() {
            Some(photo) if photo.request_id == request_id => {
                photo.audio = Some(audio);
                true
            }
            _ => false,
        }
    }

    /// Capture time of the user's current photo in epoch millis
    pub async fn latest_timestamp(&self, user_id: &str) -> Option<i64> {
        self.latest_ms.read().await.get(user_id).copied()
    }

    async fn slot(&self, user_id: &str) -> PhotoSlot {
        if let Some(slot) = self.slots.read().await.get(user_id) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().await;
        Arc::clone(
            slots
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(None))),
        )
    }
}

impl Default for PhotoStore {
    fn default() -> Self {
        Self::new()
    }
}
