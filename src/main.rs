use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use glimpse_relay::{
    create_router, AnnotationPipeline, AppState, CaptureTrigger, Config, DeviceSession,
    PhotoStore, PipelineConfig, PressType, SessionCoordinator, SessionRegistry,
    SimulatedSession, StreamingStore, TriggerConfig,
};

#[derive(Parser)]
#[command(name = "glimpse-relay")]
#[command(about = "Session-driven photo capture relay for Glimpse wearables")]
struct Args {
    /// Config file path (without extension)
    #[arg(short, long, default_value = "config/glimpse-relay")]
    config: String,

    /// Attach a simulated device session for local development
    #[arg(long)]
    simulate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Glimpse Relay v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!("Platform package: {}", cfg.platform.package_name);

    // Annotation scratch space must exist before the first capture
    tokio::fs::create_dir_all(&cfg.annotator.work_dir)
        .await
        .context("failed to create annotation work directory")?;
    tokio::fs::create_dir_all(&cfg.annotator.output_dir)
        .await
        .context("failed to create annotation output directory")?;

    let photos = Arc::new(PhotoStore::new());
    let streaming = Arc::new(StreamingStore::new());
    let registry = Arc::new(SessionRegistry::new());

    let pipeline = Arc::new(AnnotationPipeline::new(
        PipelineConfig {
            command: cfg.annotator.command.clone(),
            script: PathBuf::from(&cfg.annotator.script),
            work_dir: PathBuf::from(&cfg.annotator.work_dir),
            output_dir: PathBuf::from(&cfg.annotator.output_dir),
            public_base_url: cfg.service.public_base_url.clone(),
        },
        Arc::clone(&photos),
        Arc::clone(&registry),
    ));

    let trigger = Arc::new(CaptureTrigger::new(
        TriggerConfig {
            cooldown: Duration::from_secs(cfg.capture.cooldown_secs),
            tick_interval: Duration::from_millis(cfg.capture.tick_interval_ms),
            notice_duration: Duration::from_millis(cfg.capture.notice_duration_ms),
        },
        Arc::clone(&photos),
        Arc::clone(&streaming),
        pipeline,
    ));

    let coordinator = Arc::new(SessionCoordinator::new(
        Arc::clone(&registry),
        streaming,
        trigger,
    ));

    // Device sessions normally arrive through the platform bridge, which
    // calls SessionCoordinator::start_session / stop_session. For local
    // development --simulate attaches a scripted session instead.
    if args.simulate {
        start_simulated_session(&cfg, &coordinator).await?;
    }

    let state = AppState::new(
        photos,
        registry,
        PathBuf::from(&cfg.annotator.output_dir),
        cfg.identity.dev_fallback_user.clone(),
    );
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Attach a simulated device that takes one photo every 30 seconds
async fn start_simulated_session(
    cfg: &Config,
    coordinator: &Arc<SessionCoordinator>,
) -> Result<()> {
    let user_id = cfg
        .identity
        .dev_fallback_user
        .clone()
        .unwrap_or_else(|| "dev@local".to_string());

    let session = Arc::new(SimulatedSession::new());
    coordinator
        .start_session(&user_id, Arc::clone(&session) as Arc<dyn DeviceSession>)
        .await?;
    info!("Simulated session attached for user {}", user_id);

    tokio::spawn(async move {
        let mut presses = tokio::time::interval(Duration::from_secs(30));
        loop {
            presses.tick().await;
            if session.press(PressType::Short).await.is_err() {
                break;
            }
        }
    });

    Ok(())
}
