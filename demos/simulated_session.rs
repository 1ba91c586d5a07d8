// End-to-end demo on a simulated device session
//
// Drives the full capture -> annotate -> serve flow without glasses
// hardware or a vision model: a scripted session produces sample photos
// and a stand-in shell annotator writes fake MP3 artifacts.
//
// Run with: cargo run --example simulated_session

use anyhow::Result;
use glimpse_relay::{
    create_router, AnnotationPipeline, AppState, CaptureTrigger, DeviceSession, PhotoStore,
    PipelineConfig, PressType, SessionCoordinator, SessionRegistry, SimulatedSession,
    StreamingStore, TriggerConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

const USER: &str = "demo@local";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("🕶️  Glimpse Relay demo: simulated session");

    let work_dir = PathBuf::from("demos/work");
    let out_dir = PathBuf::from("demos/out");
    tokio::fs::create_dir_all(&work_dir).await?;
    tokio::fs::create_dir_all(&out_dir).await?;

    let photos = Arc::new(PhotoStore::new());
    let streaming = Arc::new(StreamingStore::new());
    let registry = Arc::new(SessionRegistry::new());

    let pipeline = Arc::new(AnnotationPipeline::new(
        PipelineConfig {
            command: "sh".to_string(),
            script: PathBuf::from("demos/echo_annotator.sh"),
            work_dir,
            output_dir: out_dir.clone(),
            public_base_url: "http://localhost:8080".to_string(),
        },
        Arc::clone(&photos),
        Arc::clone(&registry),
    ));

    // Short cooldown so streaming mode is visible within the demo run
    let trigger = Arc::new(CaptureTrigger::new(
        TriggerConfig {
            cooldown: Duration::from_secs(2),
            tick_interval: Duration::from_millis(250),
            notice_duration: Duration::from_millis(1000),
        },
        Arc::clone(&photos),
        Arc::clone(&streaming),
        pipeline,
    ));

    let coordinator = SessionCoordinator::new(Arc::clone(&registry), streaming, trigger);

    // 1. Device connects
    let session = Arc::new(SimulatedSession::new());
    coordinator
        .start_session(USER, Arc::clone(&session) as Arc<dyn DeviceSession>)
        .await?;
    info!("✅ Session started for {}", USER);

    // 2. Short press: one manual capture
    session.press(PressType::Short).await?;
    sleep(Duration::from_millis(500)).await;
    if let Some(photo) = photos.get(USER).await {
        info!(
            "✅ Manual capture cached: {} ({} bytes)",
            photo.request_id, photo.size
        );
    }

    // 3. Long press: streaming on, let a few automatic captures fire
    session.press(PressType::Long).await?;
    info!("📸 Streaming enabled, auto-capturing for 6s...");
    sleep(Duration::from_secs(6)).await;
    session.press(PressType::Long).await?;
    info!("📴 Streaming disabled");

    if let Some(photo) = photos.get(USER).await {
        info!(
            "Latest photo: {} at {} (audio attached: {})",
            photo.request_id,
            photo.captured_at,
            photo.audio.is_some()
        );
    }

    // 4. Serve the viewer so /webview can be opened against the demo state
    let state = AppState::new(photos, registry, out_dir, Some(USER.to_string()));
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
    info!("🌐 Viewer at http://127.0.0.1:8080/webview (Ctrl-C to quit)");
    axum::serve(listener, app).await?;

    Ok(())
}
