//! Reference audio producer
//!
//! Streams a WAV file to a running relay in real time, the way the browser
//! client streams its microphone, and renders the transcript it gets back.

use crate::audio::{pcm16_le_bytes, AudioFile};
use crate::protocol::{ConfigMessage, OutboundMessage};
use crate::transcript::TranscriptView;
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

/// How long to keep the socket open after the last frame so final results arrive
const FINAL_RESULT_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct ListenOptions {
    /// Relay WebSocket URL, e.g. `ws://localhost:8080/stream`
    pub url: String,
    pub file: PathBuf,
    pub language: Option<String>,
    pub translate: Option<String>,
    pub diarization: bool,
    pub speakers: u32,
    /// Samples per binary frame
    pub frame_samples: usize,
}

/// Stream `options.file` to the relay and return the rendered transcript
pub async fn listen(options: ListenOptions) -> Result<TranscriptView> {
    let audio = AudioFile::open(&options.file)?;
    let samples = audio.to_mono();

    let (socket, _) = tokio_tungstenite::connect_async(options.url.as_str())
        .await
        .with_context(|| format!("Failed to connect to {}", options.url))?;
    info!("Connected to relay at {}", options.url);

    let (mut ws_tx, mut ws_rx) = socket.split();

    let handshake = ConfigMessage {
        language_code: options.language.clone(),
        translate_target: options.translate.clone(),
        diarization: options.diarization,
        speaker_count: options.speakers,
        ..ConfigMessage::new(audio.sample_rate as f64)
    };
    ws_tx
        .send(Message::Text(serde_json::to_string(&handshake)?))
        .await
        .context("Failed to send handshake")?;

    let frame_samples = options.frame_samples.max(1);
    let frame_period = Duration::from_secs_f64(frame_samples as f64 / audio.sample_rate as f64);

    let sender = async move {
        let mut ticker = tokio::time::interval(frame_period);
        let mut frames = 0usize;

        for chunk in samples.chunks(frame_samples) {
            ticker.tick().await;
            ws_tx
                .send(Message::Binary(pcm16_le_bytes(chunk)))
                .await
                .context("Failed to send audio frame")?;
            frames += 1;
        }

        info!("Sent {} audio frames, waiting for final results", frames);
        tokio::time::sleep(FINAL_RESULT_GRACE).await;
        ws_tx.close().await.context("Failed to close connection")?;
        Ok::<_, anyhow::Error>(())
    };

    let receiver = async move {
        let mut view = TranscriptView::new();

        while let Some(message) = ws_rx.next().await {
            match message.context("Failed to receive from relay")? {
                Message::Text(text) => match serde_json::from_str::<OutboundMessage>(&text) {
                    Ok(message) => {
                        let before = view.final_text().len();
                        view.apply(&message);
                        print_update(&view, &message, before);
                    }
                    Err(e) => warn!("Unrecognized message from relay: {}", e),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }

        Ok::<_, anyhow::Error>(view)
    };

    let ((), view) = tokio::try_join!(sender, receiver)?;
    Ok(view)
}

fn print_update(view: &TranscriptView, message: &OutboundMessage, final_len_before: usize) {
    let OutboundMessage::Transcript(transcript) = message else {
        return;
    };

    if transcript.is_final {
        print!("\r{}", &view.final_text()[final_len_before..]);
        if let Some(translation) = &transcript.translation {
            println!("  → {}", translation);
        }
    } else {
        print!("\r{}", view.interim());
    }
    std::io::stdout().flush().ok();
}
