use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::session::SessionRegistry;
use crate::store::{CapturedPhoto, PhotoStore};

/// Where and how the annotation process runs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Interpreter or binary to invoke (e.g. "python3")
    pub command: String,
    /// Script handed to the command; receives the image path as its argument
    pub script: PathBuf,
    /// Directory captured images are written to before invocation
    pub work_dir: PathBuf,
    /// Directory the process writes `{image_stem}_result.mp3` into
    pub output_dir: PathBuf,
    /// Public base URL under which `output_dir` is served as /static/audio
    pub public_base_url: String,
}

/// Hands captured photos to the external annotation process and routes the
/// derived audio back
///
/// `annotate` returns immediately; the whole round-trip (write image, run
/// process, read artifact, attach, push to the device) happens on a spawned
/// task. Nothing here is allowed to fail the capture path: every error is
/// logged and the photo simply stays audio-less.
pub struct AnnotationPipeline {
    config: PipelineConfig,
    photos: Arc<PhotoStore>,
    sessions: Arc<SessionRegistry>,
}

impl AnnotationPipeline {
    pub fn new(
        config: PipelineConfig,
        photos: Arc<PhotoStore>,
        sessions: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            config,
            photos,
            sessions,
        }
    }

    /// Kick off annotation for a freshly cached photo
    ///
    /// Non-blocking; the returned handle is only there so callers that care
    /// (tests, the demo) can await completion.
    pub fn annotate(self: &Arc<Self>, photo: CapturedPhoto) -> JoinHandle<()> {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let user_id = photo.user_id.clone();
            let request_id = photo.request_id.clone();
            if let Err(e) = pipeline.run(photo).await {
                error!(
                    "Annotation failed for user {} (request {}): {:#}",
                    user_id, request_id, e
                );
            }
        })
    }

    async fn run(&self, photo: CapturedPhoto) -> Result<()> {
        let artifact = artifact_name(&photo.filename)?;

        tokio::fs::create_dir_all(&self.config.work_dir)
            .await
            .context("failed to create annotation work directory")?;
        let image_path = self.config.work_dir.join(&photo.filename);
        tokio::fs::write(&image_path, &photo.data)
            .await
            .context("failed to write image for annotation")?;
        info!("Photo saved to disk at {}", image_path.display());

        let output = Command::new(&self.config.command)
            .arg(&self.config.script)
            .arg(&image_path)
            .output()
            .await
            .context("failed to run annotation process")?;

        if !output.status.success() {
            bail!("annotation process exited with {}", output.status);
        }
        if !output.stderr.is_empty() {
            bail!(
                "annotation process reported: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        if !output.stdout.is_empty() {
            debug!(
                "Annotation process output: {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
        }

        let artifact_path = self.config.output_dir.join(&artifact);
        let audio = tokio::fs::read(&artifact_path)
            .await
            .with_context(|| format!("audio artifact not found at {}", artifact_path.display()))?;

        // Staleness gate: only the photo this annotation was started for may
        // receive the audio. A newer capture wins.
        if self
            .photos
            .attach_audio(&photo.user_id, &photo.request_id, audio)
            .await
        {
            info!(
                "Audio attached to photo {} for user {}",
                photo.request_id, photo.user_id
            );
        } else {
            info!(
                "Discarding stale annotation result for request {}",
                photo.request_id
            );
        }

        match self.sessions.lookup(&photo.user_id).await {
            Some(session) => {
                let audio_url = format!("{}/static/audio/{}", self.config.public_base_url, artifact);
                session
                    .play_audio(&audio_url)
                    .await
                    .context("device playback failed")?;
                info!("Audio played from {}", audio_url);
            }
            None => {
                info!(
                    "No live session for user {}, skipping audio push",
                    photo.user_id
                );
            }
        }

        Ok(())
    }
}

/// Artifact filename the annotation process writes for a given image
fn artifact_name(image_filename: &str) -> Result<String> {
    let stem = Path::new(image_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .context("image filename has no stem")?;
    Ok(format!("{}_result.mp3", stem))
}
