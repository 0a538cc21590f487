//! Client-facing wire protocol
//!
//! Client → relay: one JSON `config` handshake (see [`ConfigMessage`]), then
//! binary PCM16 frames, optionally interleaved with further handshakes.
//!
//! Relay → client: JSON [`OutboundMessage`]s tagged by `type`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One inbound unit from the client transport
#[derive(Debug, Clone, PartialEq)]
pub enum ClientFrame {
    /// Text message (expected to be a handshake)
    Text(String),
    /// Raw 16-bit little-endian PCM, mono
    Audio(Bytes),
    /// Client asked to close the connection
    Close,
}

/// Handshake as sent by a client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub language_code: Option<String>,
    pub sample_rate: f64,
    pub translate_target: Option<String>,
    pub diarization: bool,
    pub speaker_count: u32,
}

impl ConfigMessage {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            kind: "config",
            language_code: None,
            sample_rate,
            translate_target: None,
            diarization: false,
            speaker_count: 2,
        }
    }
}

/// A recognized word as forwarded to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundWord {
    pub word: String,
    /// Seconds from stream start
    pub start: f64,
    /// Seconds from stream start
    pub end: f64,
    pub speaker_tag: u32,
}

/// Transcript update for one recognition event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMessage {
    pub text: String,
    pub is_final: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub diarization: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub words: Option<Vec<OutboundWord>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub translation: Option<String>,
}

impl TranscriptMessage {
    /// Diarized words, if this message carries any
    pub fn diarized_words(&self) -> Option<&[OutboundWord]> {
        match (&self.diarization, &self.words) {
            (Some(true), Some(words)) if !words.is_empty() => Some(words),
            _ => None,
        }
    }
}

/// Message sent from the relay to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Transcript(TranscriptMessage),
    Error { error: String },
}

impl OutboundMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}
