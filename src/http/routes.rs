use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let audio_dir = state.audio_dir.clone();

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Photo viewer API
        .route("/api/latest-photo", get(handlers::latest_photo))
        .route("/api/photo/:request_id", get(handlers::get_photo))
        .route("/api/audio/:request_id", get(handlers::get_audio))
        // Server-initiated speech
        .route("/api/play-text", post(handlers::play_text))
        // Viewer page
        .route("/webview", get(handlers::webview))
        // Annotation artifacts, fetched by devices for playback
        .nest_service("/static/audio", ServeDir::new(audio_dir))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
