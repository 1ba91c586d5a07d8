use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub platform: PlatformConfig,
    pub capture: CaptureConfig,
    pub annotator: AnnotatorConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Public base URL of this service, used to build audio playback links
    /// handed to devices (e.g. an ngrok or production domain)
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Credentials for the wearable platform bridge. Both values are required;
/// startup fails without them.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    pub package_name: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    /// Minimum seconds between automatic captures while streaming
    pub cooldown_secs: u64,
    /// Auto-capture ticker interval in milliseconds
    pub tick_interval_ms: u64,
    /// How long the pre-capture notice stays on the display
    pub notice_duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotatorConfig {
    /// Interpreter or binary to run (e.g. "python3")
    pub command: String,
    /// Annotation script invoked with the image path as its argument
    pub script: String,
    /// Directory captured images are written to for the process
    pub work_dir: String,
    /// Directory the process writes MP3 artifacts into; also served at
    /// /static/audio
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Development convenience: identity assumed for requests without an
    /// authenticated user header. Leave unset in production so such
    /// requests are rejected instead.
    pub dev_fallback_user: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
