use crate::gateway::{AudioEncoding, DiarizationConfig, StreamingRecognitionConfig};
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-wide recognition defaults, shared read-only by every session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionDefaults {
    /// Language used when the handshake does not name one (e.g. "ar-SA")
    pub default_language: String,

    /// Translation target used when the handshake omits `translateTarget`
    pub translate_default_target: Option<String>,

    /// Diarization state used when the handshake omits `diarization`
    pub diarization_default_enabled: bool,

    /// Lower bound for speaker counts sent to the recognizer
    pub diarization_min: u32,

    /// Upper bound for speaker counts sent to the recognizer
    pub diarization_max: u32,

    /// Recognizer model name
    pub model: String,
}

impl Default for RecognitionDefaults {
    fn default() -> Self {
        Self {
            default_language: "ar-SA".to_string(),
            translate_default_target: None,
            diarization_default_enabled: false,
            diarization_min: 2,
            diarization_max: 8,
            model: "default".to_string(),
        }
    }
}

impl RecognitionDefaults {
    /// Reject speaker limits that cannot produce a valid diarization config
    pub fn validate(&self) -> Result<()> {
        if self.diarization_min == 0 {
            anyhow::bail!("diarization_min must be at least 1");
        }
        if self.diarization_min > self.diarization_max {
            anyhow::bail!(
                "diarization_min ({}) exceeds diarization_max ({})",
                self.diarization_min,
                self.diarization_max
            );
        }
        if self.default_language.trim().is_empty() {
            anyhow::bail!("default_language must not be empty");
        }
        Ok(())
    }

    /// Clamp a client speaker-count hint into `[diarization_min, diarization_max]`
    pub fn clamp_speaker_count(&self, hint: Option<i64>) -> u32 {
        let min = self.diarization_min;
        let max = self.diarization_max.max(min);
        match hint {
            Some(hint) if hint > 0 => hint.clamp(min as i64, max as i64) as u32,
            _ => min,
        }
    }
}

/// Why a text message was not accepted as a handshake
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    #[error("handshake is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected message type {0:?}")]
    UnexpectedType(String),

    #[error("missing sampleRate")]
    MissingSampleRate,

    #[error("invalid sampleRate {0}")]
    InvalidSampleRate(f64),
}

/// Present-but-null must stay distinguishable from absent
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHandshake {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    language_code: Option<String>,
    #[serde(default)]
    sample_rate: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    translate_target: Option<Option<String>>,
    #[serde(default)]
    diarization: Option<bool>,
    #[serde(default)]
    speaker_count: Option<f64>,
}

/// How the handshake selected the translation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateChoice {
    /// Field absent: use the server default
    ServerDefault,
    /// Field null or empty: translation disabled
    Disabled,
    Target(String),
}

/// A validated `config` handshake
#[derive(Debug, Clone, PartialEq)]
pub struct Handshake {
    pub language_code: Option<String>,
    pub sample_rate_hertz: u32,
    pub translate_target: TranslateChoice,
    pub diarization: Option<bool>,
    pub speaker_count: Option<i64>,
}

impl Handshake {
    /// Parse a client text message as a handshake
    pub fn parse(text: &str) -> Result<Self, HandshakeError> {
        let raw: RawHandshake = serde_json::from_str(text)?;

        if raw.kind != "config" {
            return Err(HandshakeError::UnexpectedType(raw.kind));
        }

        let declared = raw.sample_rate.ok_or(HandshakeError::MissingSampleRate)?;
        let rounded = declared.round();
        if !rounded.is_finite() || rounded < 1.0 || rounded > u32::MAX as f64 {
            return Err(HandshakeError::InvalidSampleRate(declared));
        }

        let translate_target = match raw.translate_target {
            None => TranslateChoice::ServerDefault,
            Some(None) => TranslateChoice::Disabled,
            Some(Some(target)) if target.trim().is_empty() => TranslateChoice::Disabled,
            Some(Some(target)) => TranslateChoice::Target(target),
        };

        Ok(Self {
            language_code: raw.language_code.filter(|code| !code.trim().is_empty()),
            sample_rate_hertz: rounded as u32,
            translate_target,
            diarization: raw.diarization,
            speaker_count: raw
                .speaker_count
                .filter(|count| count.is_finite())
                .map(|count| count.round() as i64),
        })
    }
}

/// Effective parameters of a configured session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    pub language_code: String,
    pub sample_rate_hertz: u32,
    pub translate_target: Option<String>,
    pub diarization_enabled: bool,
    /// Already clamped into the server's speaker limits
    pub speaker_count_hint: u32,
}

impl SessionParams {
    /// Resolve a handshake against the server defaults
    pub fn resolve(handshake: Handshake, defaults: &RecognitionDefaults) -> Self {
        let translate_target = match handshake.translate_target {
            TranslateChoice::ServerDefault => defaults
                .translate_default_target
                .clone()
                .filter(|target| !target.trim().is_empty()),
            TranslateChoice::Disabled => None,
            TranslateChoice::Target(target) => Some(target),
        };

        Self {
            language_code: handshake
                .language_code
                .unwrap_or_else(|| defaults.default_language.clone()),
            sample_rate_hertz: handshake.sample_rate_hertz,
            translate_target,
            diarization_enabled: handshake
                .diarization
                .unwrap_or(defaults.diarization_default_enabled),
            speaker_count_hint: defaults.clamp_speaker_count(handshake.speaker_count),
        }
    }

    /// Synthesize the recognizer configuration for these parameters
    pub fn recognition_config(&self, defaults: &RecognitionDefaults) -> StreamingRecognitionConfig {
        let diarization_config = self.diarization_enabled.then(|| {
            let count = defaults.clamp_speaker_count(Some(self.speaker_count_hint as i64));
            DiarizationConfig {
                enable_speaker_diarization: true,
                min_speaker_count: count,
                max_speaker_count: count,
            }
        });

        StreamingRecognitionConfig {
            encoding: AudioEncoding::Linear16,
            sample_rate_hertz: self.sample_rate_hertz,
            language_code: self.language_code.clone(),
            enable_automatic_punctuation: true,
            model: defaults.model.clone(),
            diarization_config,
            interim_results: true,
        }
    }
}
