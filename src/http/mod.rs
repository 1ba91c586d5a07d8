//! HTTP API server for the photo viewer
//!
//! This module provides the REST surface consumed by the web viewer:
//! - GET /api/latest-photo - Metadata for the user's newest photo
//! - GET /api/photo/:request_id - Raw image bytes
//! - GET /api/audio/:request_id - Derived annotation audio
//! - POST /api/play-text - Speak text on a user's device
//! - GET /webview - Viewer page
//! - GET /static/audio/* - Annotation artifacts for device playback
//! - GET /health - Health check
//!
//! The surface is read-only with respect to captures: photos are only ever
//! taken by the device-side trigger, never by an HTTP request.

mod handlers;
mod routes;
mod state;

pub use handlers::USER_ID_HEADER;
pub use routes::create_router;
pub use state::AppState;
