// Tests for client-side rendering of relay messages

use speech_relay::protocol::{OutboundMessage, OutboundWord, TranscriptMessage};
use speech_relay::transcript::TranscriptView;

fn plain(text: &str, is_final: bool) -> OutboundMessage {
    OutboundMessage::Transcript(TranscriptMessage {
        text: text.to_string(),
        is_final,
        diarization: None,
        words: None,
        translation: None,
    })
}

fn diarized(words: &[(u32, &str)], is_final: bool) -> OutboundMessage {
    let text = words.iter().map(|(_, w)| *w).collect::<Vec<_>>().join(" ");
    OutboundMessage::Transcript(TranscriptMessage {
        text,
        is_final,
        diarization: Some(true),
        words: Some(
            words
                .iter()
                .map(|(tag, word)| OutboundWord {
                    word: word.to_string(),
                    start: 0.0,
                    end: 0.0,
                    speaker_tag: *tag,
                })
                .collect(),
        ),
        translation: None,
    })
}

#[test]
fn test_interim_replaces_and_final_appends() {
    let mut view = TranscriptView::new();

    view.apply(&plain("hel", false));
    view.apply(&plain("hello", false));
    assert_eq!(view.interim(), "hello");
    assert_eq!(view.final_text(), "");

    view.apply(&plain("hello world", true));
    assert_eq!(view.interim(), "");
    assert_eq!(view.final_text(), "hello world\n");

    view.apply(&plain("again", true));
    assert_eq!(view.final_text(), "hello world\nagain\n");
}

#[test]
fn test_interim_diarized_words_render_ungrouped() {
    let mut view = TranscriptView::new();
    view.apply(&diarized(&[(1, "hi"), (2, "there"), (1, "you")], false));
    assert_eq!(view.interim(), "hi there you");
}

#[test]
fn test_final_diarized_results_accumulate_as_blocks() {
    let mut view = TranscriptView::new();

    view.apply(&diarized(&[(1, "hi"), (2, "there"), (1, "you")], true));
    view.apply(&diarized(&[(2, "bye")], true));

    assert_eq!(
        view.final_text(),
        "Speaker 1 hi you\nSpeaker 2 there\nSpeaker 2 bye\n"
    );
}

#[test]
fn test_translations_accumulate_separately() {
    let mut view = TranscriptView::new();

    let mut message = match plain("bonjour", true) {
        OutboundMessage::Transcript(t) => t,
        _ => unreachable!(),
    };
    message.translation = Some("hello".to_string());
    view.apply(&OutboundMessage::Transcript(message));
    view.apply(&plain("sans traduction", true));

    assert_eq!(view.translation(), "hello\n");
    assert_eq!(view.final_text(), "bonjour\nsans traduction\n");
}

#[test]
fn test_errors_do_not_change_transcript() {
    let mut view = TranscriptView::new();
    view.apply(&plain("kept", true));
    view.apply(&OutboundMessage::error("stream failed"));
    assert_eq!(view.final_text(), "kept\n");
}

#[test]
fn test_outbound_wire_format() {
    let json = serde_json::to_value(plain("hello", false)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"type": "transcript", "text": "hello", "isFinal": false})
    );

    let json = serde_json::to_value(diarized(&[(1, "hi")], true)).unwrap();
    assert_eq!(json["diarization"], true);
    assert_eq!(json["words"][0]["word"], "hi");
    assert_eq!(json["words"][0]["speakerTag"], 1);
    assert!(json.get("translation").is_none());

    let json = serde_json::to_value(OutboundMessage::error("boom")).unwrap();
    assert_eq!(json, serde_json::json!({"type": "error", "error": "boom"}));

    let parsed: OutboundMessage =
        serde_json::from_str(r#"{"type":"transcript","text":"x","isFinal":true,"translation":"y"}"#)
            .unwrap();
    match parsed {
        OutboundMessage::Transcript(t) => {
            assert!(t.is_final);
            assert_eq!(t.translation.as_deref(), Some("y"));
        }
        other => panic!("unexpected {:?}", other),
    }
}
