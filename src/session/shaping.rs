use crate::diarization::UNTAGGED_SPEAKER;
use crate::gateway::RecognitionEvent;
use crate::protocol::{OutboundWord, TranscriptMessage};

/// Build the client message for one recognition event, without translation
///
/// Diarized words are attached whenever diarization is enabled and the event
/// carries any, interim events included.
pub fn transcript_message(event: RecognitionEvent, diarization_enabled: bool) -> TranscriptMessage {
    let mut message = TranscriptMessage {
        text: event.transcript,
        is_final: event.is_final,
        diarization: None,
        words: None,
        translation: None,
    };

    if diarization_enabled && !event.words.is_empty() {
        message.diarization = Some(true);
        message.words = Some(
            event
                .words
                .into_iter()
                .map(|word| OutboundWord {
                    word: word.text,
                    start: word.start_offset,
                    end: word.end_offset,
                    speaker_tag: word.speaker_tag.unwrap_or(UNTAGGED_SPEAKER),
                })
                .collect(),
        );
    }

    message
}
