// Annotation pipeline against real child processes: artifact pickup,
// failure signaling (exit code, stderr, missing output), the staleness
// gate, and the push back to the live session.

use glimpse_relay::{AnnotationPipeline, PhotoStore, PipelineConfig, SessionRegistry};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod common;
use common::{test_photo, FakeSession};

struct Rig {
    pipeline: Arc<AnnotationPipeline>,
    photos: Arc<PhotoStore>,
    registry: Arc<SessionRegistry>,
    _scratch: tempfile::TempDir,
}

/// Build a pipeline whose annotator is the given shell script body
fn rig(script_body: &str) -> Rig {
    let scratch = tempfile::tempdir().expect("tempdir");
    let script = scratch.path().join("annotate.sh");
    fs::write(&script, script_body).expect("write script");

    let photos = Arc::new(PhotoStore::new());
    let registry = Arc::new(SessionRegistry::new());
    let pipeline = Arc::new(AnnotationPipeline::new(
        PipelineConfig {
            command: "sh".to_string(),
            script,
            work_dir: scratch.path().join("work"),
            output_dir: scratch.path().join("out"),
            public_base_url: "http://relay.test".to_string(),
        },
        Arc::clone(&photos),
        Arc::clone(&registry),
    ));

    Rig {
        pipeline,
        photos,
        registry,
        _scratch: scratch,
    }
}

/// Script that honors the process contract: reads the image path from $1
/// and writes {stem}_result.mp3 next to the configured output directory
fn working_annotator() -> String {
    "#!/bin/sh\n\
     stem=$(basename \"$1\")\n\
     stem=\"${stem%.*}\"\n\
     out=\"$(dirname \"$1\")/../out\"\n\
     mkdir -p \"$out\"\n\
     printf 'mp3-bytes' > \"$out/${stem}_result.mp3\"\n"
        .to_string()
}

#[tokio::test]
async fn test_success_attaches_audio() {
    let rig = rig(&working_annotator());
    let photo = test_photo("carol", "r1");
    rig.photos.put(photo.clone()).await;

    rig.pipeline.annotate(photo).await.unwrap();

    let cached = rig.photos.get("carol").await.unwrap();
    assert_eq!(cached.audio, Some(b"mp3-bytes".to_vec()));
}

#[tokio::test]
async fn test_success_pushes_playback_url_to_session() {
    let rig = rig(&working_annotator());
    let session = Arc::new(FakeSession::new());
    rig.registry
        .register("carol", Arc::clone(&session) as _)
        .await;

    let photo = test_photo("carol", "r1");
    rig.photos.put(photo.clone()).await;
    rig.pipeline.annotate(photo).await.unwrap();

    let played = session.played().await;
    assert_eq!(
        played,
        vec!["http://relay.test/static/audio/r1_result.mp3".to_string()]
    );
}

#[tokio::test]
async fn test_no_session_is_not_an_error() {
    let rig = rig(&working_annotator());
    let photo = test_photo("carol", "r1");
    rig.photos.put(photo.clone()).await;

    // Nobody registered: the push is skipped but the audio still attaches
    rig.pipeline.annotate(photo).await.unwrap();
    assert!(rig.photos.get("carol").await.unwrap().audio.is_some());
}

#[tokio::test]
async fn test_nonzero_exit_leaves_photo_audioless() {
    let rig = rig("#!/bin/sh\nexit 1\n");
    let photo = test_photo("carol", "r1");
    rig.photos.put(photo.clone()).await;

    rig.pipeline.annotate(photo).await.unwrap();
    assert!(rig.photos.get("carol").await.unwrap().audio.is_none());
}

#[tokio::test]
async fn test_stderr_output_counts_as_failure() {
    // Exit code 0 but noise on stderr: the contract treats that as failure
    let rig = rig("#!/bin/sh\necho 'model exploded' >&2\nexit 0\n");
    let photo = test_photo("carol", "r1");
    rig.photos.put(photo.clone()).await;

    rig.pipeline.annotate(photo).await.unwrap();
    assert!(rig.photos.get("carol").await.unwrap().audio.is_none());
}

#[tokio::test]
async fn test_missing_artifact_leaves_photo_audioless() {
    let rig = rig("#!/bin/sh\nexit 0\n");
    let photo = test_photo("carol", "r1");
    rig.photos.put(photo.clone()).await;

    rig.pipeline.annotate(photo).await.unwrap();
    assert!(rig.photos.get("carol").await.unwrap().audio.is_none());
}

#[tokio::test]
async fn test_stale_result_discarded_after_newer_capture() {
    let rig = rig(&working_annotator());
    let p1 = test_photo("carol", "r1");
    rig.photos.put(p1.clone()).await;
    // r2 supersedes r1 before r1's annotation lands
    rig.photos.put(test_photo("carol", "r2")).await;

    rig.pipeline.annotate(p1).await.unwrap();

    let cached = rig.photos.get("carol").await.unwrap();
    assert_eq!(cached.request_id, "r2");
    assert!(cached.audio.is_none(), "stale audio must not attach to r2");
}

#[tokio::test]
async fn test_image_written_for_process() {
    let rig = rig(
        "#!/bin/sh\n\
         test -s \"$1\" || { echo 'missing image' >&2; exit 1; }\n\
         stem=$(basename \"$1\"); stem=\"${stem%.*}\"\n\
         out=\"$(dirname \"$1\")/../out\"; mkdir -p \"$out\"\n\
         printf 'ok' > \"$out/${stem}_result.mp3\"\n",
    );
    let photo = test_photo("carol", "r1");
    rig.photos.put(photo.clone()).await;

    rig.pipeline.annotate(photo).await.unwrap();
    assert!(
        rig.photos.get("carol").await.unwrap().audio.is_some(),
        "process should have seen the image bytes on disk"
    );
}

#[tokio::test]
async fn test_work_dir_keeps_image_file() {
    let rig = rig(&working_annotator());
    let photo = test_photo("carol", "r1");
    let filename = photo.filename.clone();
    rig.photos.put(photo.clone()).await;
    rig.pipeline.annotate(photo).await.unwrap();

    let image_path: PathBuf = rig._scratch.path().join("work").join(filename);
    assert!(image_path.exists());
}
