//! Client-side transcript rendering
//!
//! [`TranscriptView`] applies relay messages the way a receiving client does:
//! interim text replaces the interim line, final text is appended to a growing
//! transcript (grouped into speaker blocks when diarized), and translations
//! accumulate separately.

use crate::diarization::{group_by_speaker, render_blocks};
use crate::protocol::{OutboundMessage, TranscriptMessage};
use tracing::error;

#[derive(Debug, Default, Clone)]
pub struct TranscriptView {
    interim: String,
    final_text: String,
    translation: String,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, message: &OutboundMessage) {
        match message {
            OutboundMessage::Transcript(transcript) => self.apply_transcript(transcript),
            OutboundMessage::Error { error } => error!("Relay reported an error: {}", error),
        }
    }

    fn apply_transcript(&mut self, msg: &TranscriptMessage) {
        if !msg.is_final {
            self.interim = match msg.diarized_words() {
                // Interim words are shown live, ungrouped
                Some(words) => words
                    .iter()
                    .map(|w| w.word.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                None => msg.text.clone(),
            };
            return;
        }

        self.interim.clear();
        match msg.diarized_words() {
            Some(words) => {
                let blocks =
                    group_by_speaker(words.iter().map(|w| (w.speaker_tag, w.word.as_str())));
                self.final_text.push_str(&render_blocks(&blocks));
            }
            None => {
                self.final_text.push_str(&msg.text);
                self.final_text.push('\n');
            }
        }

        if let Some(translation) = &msg.translation {
            self.translation.push_str(translation);
            self.translation.push('\n');
        }
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    pub fn final_text(&self) -> &str {
        &self.final_text
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }
}
