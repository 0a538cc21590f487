use serde::{Deserialize, Serialize};

/// Audio encoding accepted by the recognition channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AudioEncoding {
    /// 16-bit signed little-endian PCM, mono
    Linear16,
}

/// Speaker diarization bounds sent to the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiarizationConfig {
    pub enable_speaker_diarization: bool,
    pub min_speaker_count: u32,
    pub max_speaker_count: u32,
}

/// Configuration of one recognition channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingRecognitionConfig {
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: u32,
    pub language_code: String,
    pub enable_automatic_punctuation: bool,
    pub model: String,
    pub diarization_config: Option<DiarizationConfig>,
    pub interim_results: bool,
}

/// A single recognized word with timing and optional speaker
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedWord {
    pub text: String,
    /// Offset from stream start, in seconds
    pub start_offset: f64,
    /// Offset from stream start, in seconds
    pub end_offset: f64,
    pub speaker_tag: Option<u32>,
}

/// One incremental hypothesis emitted by the recognizer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecognitionEvent {
    pub transcript: String,
    pub is_final: bool,
    pub words: Vec<RecognizedWord>,
}

impl RecognitionEvent {
    pub fn interim(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: false,
            words: Vec::new(),
        }
    }

    pub fn final_result(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: true,
            words: Vec::new(),
        }
    }

    pub fn with_words(mut self, words: Vec<RecognizedWord>) -> Self {
        self.words = words;
        self
    }
}
