use crate::session::RecognitionDefaults;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up when no `--config` is given
pub const DEFAULT_CONFIG_PATH: &str = "config/speech-relay";

/// Environment variable prefix, e.g. `SPEECH_RELAY__SERVICE__HTTP__PORT=9000`
pub const ENV_PREFIX: &str = "SPEECH_RELAY";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub recognition: RecognitionConfig,
    pub nats: NatsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "speech-relay".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Directory of client assets served at `/`
    pub static_dir: PathBuf,
    /// WebSocket upgrade path for audio sessions
    pub stream_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("client"),
            stream_path: "/stream".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub default_language: String,
    pub translate_default_target: Option<String>,
    pub diarization_default_enabled: bool,
    pub diarization_min: u32,
    pub diarization_max: u32,
    pub model: String,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        let defaults = RecognitionDefaults::default();
        Self {
            default_language: defaults.default_language,
            translate_default_target: defaults.translate_default_target,
            diarization_default_enabled: defaults.diarization_default_enabled,
            diarization_min: defaults.diarization_min,
            diarization_max: defaults.diarization_max,
            model: defaults.model,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NatsConfig {
    pub url: String,
    pub recognize_subject: String,
    pub results_subject: String,
    pub translate_subject: String,
    /// Per-channel queue bound for audio frames and recognition updates
    pub channel_capacity: usize,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
            recognize_subject: "stt.recognize".to_string(),
            results_subject: "stt.results".to_string(),
            translate_subject: "translate.text".to_string(),
            channel_capacity: 64,
        }
    }
}

impl Config {
    /// Load configuration: file (explicit or default location), then environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to load configuration")?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.recognition_defaults()?;
        Ok(cfg)
    }

    /// Validated, immutable defaults handed to every session
    pub fn recognition_defaults(&self) -> Result<RecognitionDefaults> {
        let defaults = RecognitionDefaults {
            default_language: self.recognition.default_language.clone(),
            translate_default_target: self
                .recognition
                .translate_default_target
                .clone()
                .filter(|target| !target.trim().is_empty()),
            diarization_default_enabled: self.recognition.diarization_default_enabled,
            diarization_min: self.recognition.diarization_min,
            diarization_max: self.recognition.diarization_max,
            model: self.recognition.model.clone(),
        };

        defaults
            .validate()
            .context("Invalid recognition configuration")?;

        Ok(defaults)
    }
}
