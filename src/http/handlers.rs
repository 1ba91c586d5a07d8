use super::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Viewer page served at /webview
const VIEWER_PAGE: &str = include_str!("../../assets/photo-viewer.html");

/// Shown instead of the viewer when the request carries no identity
const UNAUTHENTICATED_PAGE: &str = r#"<html>
  <head><title>Photo Viewer - Not Authenticated</title></head>
  <body style="font-family: Arial, sans-serif; text-align: center; padding: 50px;">
    <h1>Please open this page from the Glimpse companion app</h1>
  </body>
</html>"#;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPhotoResponse {
    /// Capture id of the cached photo
    pub request_id: String,
    /// Capture time in epoch milliseconds
    pub timestamp: i64,
    pub has_photo: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayTextRequest {
    pub text: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlayTextResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Identity
// ============================================================================

/// Header the hosting runtime sets once it has authenticated the caller
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resolve the calling user: the authenticated header first, then the
/// development-only fallback if one is configured
fn resolve_user(headers: &HeaderMap, state: &AppState) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| state.fallback_user.clone())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "No user identity on request".to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/latest-photo
/// Metadata for the user's most recent photo
pub async fn latest_photo(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let Some(user_id) = resolve_user(&headers, &state) else {
        return unauthorized();
    };

    match state.photos.get(&user_id).await {
        Some(photo) => (
            StatusCode::OK,
            Json(LatestPhotoResponse {
                request_id: photo.request_id,
                timestamp: photo.captured_at.timestamp_millis(),
                has_photo: true,
            }),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No photo available".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /api/photo/:request_id
/// Raw image bytes for the user's cached photo, if the id still matches
pub async fn get_photo(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(user_id) = resolve_user(&headers, &state) else {
        return unauthorized();
    };

    match state.photos.get(&user_id).await {
        Some(photo) if photo.request_id == request_id => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, photo.mime_type.clone()),
                (header::CACHE_CONTROL, "no-cache".to_string()),
            ],
            photo.data,
        )
            .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Photo not found".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /api/audio/:request_id
/// Derived annotation audio for the cached photo, once attached
pub async fn get_audio(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let Some(user_id) = resolve_user(&headers, &state) else {
        return unauthorized();
    };

    let audio = state.photos.get(&user_id).await.and_then(|photo| {
        if photo.request_id == request_id {
            photo.audio
        } else {
            None
        }
    });

    match audio {
        Some(audio) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "audio/mpeg".to_string()),
                (header::CACHE_CONTROL, "no-cache".to_string()),
            ],
            audio,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Audio not found".to_string(),
            }),
        )
            .into_response(),
    }
}

/// POST /api/play-text
/// Speak arbitrary text on a user's live device session
pub async fn play_text(
    State(state): State<AppState>,
    Json(req): Json<PlayTextRequest>,
) -> impl IntoResponse {
    let text = req.text.unwrap_or_default();
    let user_id = req.user_id.unwrap_or_default();
    if text.is_empty() || user_id.is_empty() {
        warn!("play-text request missing text or userId");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Must specify text and userId".to_string(),
            }),
        )
            .into_response();
    }

    let Some(session) = state.sessions.lookup(&user_id).await else {
        error!("No active session for user {}", user_id);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "No user session found".to_string(),
            }),
        )
            .into_response();
    };

    if let Err(e) = session.speak(&text).await {
        error!("Speech playback failed for user {}: {:#}", user_id, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Speech playback failed: {}", e),
            }),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(PlayTextResponse {
            status: "ok".to_string(),
        }),
    )
        .into_response()
}

/// GET /webview
/// The photo viewer page
pub async fn webview(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if resolve_user(&headers, &state).is_none() {
        return (StatusCode::UNAUTHORIZED, Html(UNAUTHENTICATED_PAGE)).into_response();
    }
    Html(VIEWER_PAGE).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
