use std::path::PathBuf;
use std::sync::Arc;

use crate::session::SessionRegistry;
use crate::store::PhotoStore;

/// Shared application state for HTTP handlers
///
/// The HTTP surface only ever reads the photo store and the session
/// registry; captures are triggered by the device side, never by a request
/// (the text-to-speech passthrough being the one server-initiated action).
#[derive(Clone)]
pub struct AppState {
    /// Latest captured photo per user
    pub photos: Arc<PhotoStore>,
    /// Live device session per user
    pub sessions: Arc<SessionRegistry>,
    /// Directory annotation artifacts are served from (/static/audio)
    pub audio_dir: PathBuf,
    /// Development-only identity used when a request carries no user header
    pub fallback_user: Option<String>,
}

impl AppState {
    pub fn new(
        photos: Arc<PhotoStore>,
        sessions: Arc<SessionRegistry>,
        audio_dir: PathBuf,
        fallback_user: Option<String>,
    ) -> Self {
        Self {
            photos,
            sessions,
            audio_dir,
            fallback_user,
        }
    }
}
