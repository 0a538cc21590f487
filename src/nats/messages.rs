use crate::gateway::{
    AudioEncoding, DiarizationConfig, RecognitionEvent, RecognitionUpdate, RecognizedWord,
    StreamingRecognitionConfig,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audio frame message published to NATS
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFrameMessage {
    pub channel_id: Uuid,
    pub sequence: u64,
    pub pcm: String, // Base64-encoded PCM bytes
    #[serde(rename = "final")]
    pub final_frame: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfigMessage {
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    pub language_code: String,
    pub enable_automatic_punctuation: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub diarization_config: Option<DiarizationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingConfigMessage {
    pub config: RecognitionConfigMessage,
    pub interim_results: bool,
}

/// Request opening a recognition stream, published before any audio
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingRecognizeRequest {
    pub channel_id: Uuid,
    pub streaming_config: StreamingConfigMessage,
}

impl StreamingRecognizeRequest {
    pub fn new(channel_id: Uuid, config: &StreamingRecognitionConfig) -> Self {
        Self {
            channel_id,
            streaming_config: StreamingConfigMessage {
                config: RecognitionConfigMessage {
                    encoding: config.encoding,
                    sample_rate_hertz: config.sample_rate_hertz,
                    language_code: config.language_code.clone(),
                    enable_automatic_punctuation: config.enable_automatic_punctuation,
                    model: config.model.clone(),
                    diarization_config: config.diarization_config,
                },
                interim_results: config.interim_results,
            },
        }
    }
}

/// Protobuf-style duration (`{seconds, nanos}`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DurationMessage {
    #[serde(default)]
    pub seconds: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl DurationMessage {
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + self.nanos as f64 / 1_000_000_000.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfoMessage {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub start_time: Option<DurationMessage>,
    #[serde(default)]
    pub end_time: Option<DurationMessage>,
    #[serde(default)]
    pub speaker_tag: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeMessage {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub words: Vec<WordInfoMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingResultMessage {
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub alternatives: Vec<AlternativeMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Recognition response received on the channel's results subject
#[derive(Debug, Serialize, Deserialize)]
pub struct StreamingRecognizeResponse {
    #[serde(default)]
    pub results: Vec<StreamingResultMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StatusMessage>,
}

impl StreamingRecognizeResponse {
    /// Convert to a channel update
    ///
    /// Only the first result and its first alternative are used. Responses
    /// without either carry nothing and yield `None`.
    pub fn into_update(self) -> Option<RecognitionUpdate> {
        if let Some(status) = self.error {
            return Some(RecognitionUpdate::Failed(status.message));
        }

        let result = self.results.into_iter().next()?;
        let is_final = result.is_final;
        let alternative = result.alternatives.into_iter().next()?;

        let words = alternative
            .words
            .into_iter()
            .map(|w| RecognizedWord {
                text: w.word,
                start_offset: w.start_time.unwrap_or_default().as_secs_f64(),
                end_offset: w.end_time.unwrap_or_default().as_secs_f64(),
                speaker_tag: w.speaker_tag,
            })
            .collect();

        Some(RecognitionUpdate::Event(RecognitionEvent {
            transcript: alternative.transcript,
            is_final,
            words,
        }))
    }
}

/// Translation request sent over NATS request/reply
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub target_language_code: String,
}

/// Translation reply
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateReply {
    #[serde(default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
