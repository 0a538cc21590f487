use super::config::{Handshake, RecognitionDefaults, SessionParams};
use super::shaping::transcript_message;
use super::stats::SessionStats;
use crate::diarization::{group_by_speaker, render_blocks};
use crate::gateway::{
    RecognitionChannel, RecognitionEvent, RecognitionGateway, RecognitionUpdate,
    TranslationGateway,
};
use crate::protocol::{ClientFrame, OutboundMessage};
use bytes::Bytes;
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::collections::VecDeque;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Lifecycle of one client connection
///
/// `AwaitingConfig → Streaming → (restart → Streaming)*`, closed when `run`
/// returns. A `Streaming` session without a channel is waiting for a fresh
/// handshake after a recognition failure.
enum SessionState {
    AwaitingConfig,
    Streaming {
        params: SessionParams,
        channel: Option<RecognitionChannel>,
    },
}

/// Everything a session reacts to, serialized onto one sequence
enum SessionInput {
    Client(ClientFrame),
    Recognition(Option<RecognitionUpdate>),
}

/// The client can no longer receive messages
struct Disconnected;

/// Relays one client's audio to a recognition channel and its results back
pub struct SessionRelay {
    id: Uuid,
    defaults: Arc<RecognitionDefaults>,
    recognizer: Arc<dyn RecognitionGateway>,
    translator: Arc<dyn TranslationGateway>,
    state: SessionState,
    stats: SessionStats,
    /// Client frames read while a translation was in flight
    deferred: VecDeque<ClientFrame>,
}

impl SessionRelay {
    pub fn new(
        defaults: Arc<RecognitionDefaults>,
        recognizer: Arc<dyn RecognitionGateway>,
        translator: Arc<dyn TranslationGateway>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            defaults,
            recognizer,
            translator,
            state: SessionState::AwaitingConfig,
            stats: SessionStats::new(id),
            deferred: VecDeque::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Drive the session until the client disconnects
    ///
    /// Client frames and recognition updates are handled strictly one at a
    /// time. Returns the final session statistics.
    pub async fn run<I, O>(mut self, mut inbound: I, mut outbound: O) -> SessionStats
    where
        I: Stream<Item = ClientFrame> + Unpin,
        O: Sink<OutboundMessage> + Unpin,
        O::Error: Display,
    {
        info!(session = %self.id, "Session connected");

        loop {
            let input = match self.deferred.pop_front() {
                Some(frame) => SessionInput::Client(frame),
                None => tokio::select! {
                    frame = inbound.next() => match frame {
                        Some(ClientFrame::Close) | None => break,
                        Some(frame) => SessionInput::Client(frame),
                    },
                    update = next_update(&mut self.state) => SessionInput::Recognition(update),
                },
            };

            let handled = match input {
                SessionInput::Client(frame) => self.handle_client_frame(frame, &mut outbound).await,
                SessionInput::Recognition(update) => {
                    self.handle_update(update, &mut inbound, &mut outbound).await
                }
            };

            if handled.is_err() {
                break;
            }
        }

        self.close()
    }

    async fn handle_client_frame<O>(
        &mut self,
        frame: ClientFrame,
        outbound: &mut O,
    ) -> Result<(), Disconnected>
    where
        O: Sink<OutboundMessage> + Unpin,
        O::Error: Display,
    {
        match frame {
            ClientFrame::Text(text) => match Handshake::parse(&text) {
                Ok(handshake) => self.configure(handshake, outbound).await,
                Err(e) => {
                    debug!(session = %self.id, "Ignoring text message: {}", e);
                    Ok(())
                }
            },
            ClientFrame::Audio(frame) => self.forward_audio(frame, outbound).await,
            ClientFrame::Close => Ok(()),
        }
    }

    /// Apply a handshake: close any open channel, then open a new one
    async fn configure<O>(&mut self, handshake: Handshake, outbound: &mut O) -> Result<(), Disconnected>
    where
        O: Sink<OutboundMessage> + Unpin,
        O::Error: Display,
    {
        let params = SessionParams::resolve(handshake, &self.defaults);
        let config = params.recognition_config(&self.defaults);

        let previous = std::mem::replace(&mut self.state, SessionState::AwaitingConfig);
        if let SessionState::Streaming {
            channel: Some(channel),
            ..
        } = previous
        {
            info!(session = %self.id, "Restarting recognition channel {}", channel.id());
            channel.close();
            self.stats.restarts += 1;
        }

        info!(
            session = %self.id,
            language = %params.language_code,
            sample_rate = params.sample_rate_hertz,
            diarization = params.diarization_enabled,
            translate = ?params.translate_target,
            "Session configured"
        );

        match self.recognizer.open(config).await {
            Ok(channel) => {
                info!(
                    session = %self.id,
                    "Opened recognition channel {} via {}",
                    channel.id(),
                    self.recognizer.name()
                );
                self.state = SessionState::Streaming {
                    params,
                    channel: Some(channel),
                };
                Ok(())
            }
            Err(e) => {
                error!(session = %self.id, "Failed to open recognition channel: {:#}", e);
                self.state = SessionState::Streaming {
                    params,
                    channel: None,
                };
                self.stats.channel_failures += 1;
                self.send(outbound, OutboundMessage::error(format!("{:#}", e)))
                    .await
            }
        }
    }

    async fn forward_audio<O>(&mut self, frame: Bytes, outbound: &mut O) -> Result<(), Disconnected>
    where
        O: Sink<OutboundMessage> + Unpin,
        O::Error: Display,
    {
        let failure = match &self.state {
            SessionState::Streaming {
                channel: Some(channel),
                ..
            } => match channel.write(frame).await {
                Ok(()) => {
                    self.stats.frames_forwarded += 1;
                    return Ok(());
                }
                Err(e) => e.to_string(),
            },
            _ => {
                // Not configured yet, or the channel failed: nothing to write to
                self.stats.frames_dropped += 1;
                return Ok(());
            }
        };

        self.fail_channel(failure, outbound).await
    }

    async fn handle_update<I, O>(
        &mut self,
        update: Option<RecognitionUpdate>,
        inbound: &mut I,
        outbound: &mut O,
    ) -> Result<(), Disconnected>
    where
        I: Stream<Item = ClientFrame> + Unpin,
        O: Sink<OutboundMessage> + Unpin,
        O::Error: Display,
    {
        match update {
            Some(RecognitionUpdate::Event(event)) => self.deliver(event, inbound, outbound).await,
            Some(RecognitionUpdate::Failed(reason)) => self.fail_channel(reason, outbound).await,
            // The gateway ended the stream without reporting why
            None => self.fail_channel(CHANNEL_ENDED.to_string(), outbound).await,
        }
    }

    /// Shape one recognition event and send it, translating final text if configured
    async fn deliver<I, O>(
        &mut self,
        event: RecognitionEvent,
        inbound: &mut I,
        outbound: &mut O,
    ) -> Result<(), Disconnected>
    where
        I: Stream<Item = ClientFrame> + Unpin,
        O: Sink<OutboundMessage> + Unpin,
        O::Error: Display,
    {
        let SessionState::Streaming { params, .. } = &self.state else {
            return Ok(());
        };
        let target = params.translate_target.clone();
        let mut message = transcript_message(event, params.diarization_enabled);

        if message.is_final {
            if let Some(words) = message.diarized_words() {
                let blocks = group_by_speaker(words.iter().map(|w| (w.speaker_tag, w.word.as_str())));
                debug!(session = %self.id, "Final utterance:\n{}", render_blocks(&blocks));
            }

            if let Some(target) = target.filter(|_| !message.text.is_empty()) {
                message.translation = self.translate(&message.text, &target, inbound).await?;
            }
        }

        self.send(outbound, OutboundMessage::Transcript(message)).await?;
        self.stats.transcripts_sent += 1;
        Ok(())
    }

    /// Translate final text while still watching the client
    ///
    /// Frames that arrive meanwhile are deferred and handled after the
    /// transcript is sent. A disconnect discards the translation.
    async fn translate<I>(
        &mut self,
        text: &str,
        target: &str,
        inbound: &mut I,
    ) -> Result<Option<String>, Disconnected>
    where
        I: Stream<Item = ClientFrame> + Unpin,
    {
        let translator = Arc::clone(&self.translator);
        let translation = translator.translate(text, target);
        tokio::pin!(translation);

        loop {
            tokio::select! {
                result = &mut translation => {
                    return Ok(match result {
                        Ok(translated) if !translated.is_empty() => Some(translated),
                        Ok(_) => None,
                        Err(e) => {
                            warn!(session = %self.id, "Translation to {} failed: {:#}", target, e);
                            self.stats.translation_failures += 1;
                            None
                        }
                    });
                }
                frame = inbound.next() => match frame {
                    Some(ClientFrame::Close) | None => {
                        debug!(session = %self.id, "Client left during translation; discarding it");
                        return Err(Disconnected);
                    }
                    Some(frame) => self.deferred.push_back(frame),
                },
            }
        }
    }

    /// Close the current channel and report the failure to the client
    ///
    /// The session stays in `Streaming` without a channel until a new handshake.
    async fn fail_channel<O>(&mut self, reason: String, outbound: &mut O) -> Result<(), Disconnected>
    where
        O: Sink<OutboundMessage> + Unpin,
        O::Error: Display,
    {
        if let Some(channel) = self.take_channel() {
            warn!(session = %self.id, "Recognition channel {} failed: {}", channel.id(), reason);
            channel.close();
        }
        self.stats.channel_failures += 1;
        self.send(outbound, OutboundMessage::error(reason)).await
    }

    fn take_channel(&mut self) -> Option<RecognitionChannel> {
        match &mut self.state {
            SessionState::Streaming { channel, .. } => channel.take(),
            SessionState::AwaitingConfig => None,
        }
    }

    async fn send<O>(&self, outbound: &mut O, message: OutboundMessage) -> Result<(), Disconnected>
    where
        O: Sink<OutboundMessage> + Unpin,
        O::Error: Display,
    {
        outbound.send(message).await.map_err(|e| {
            debug!(session = %self.id, "Client is gone: {}", e);
            Disconnected
        })
    }

    fn close(mut self) -> SessionStats {
        if let Some(channel) = self.take_channel() {
            channel.close();
        }
        self.stats.finish();

        info!(
            session = %self.id,
            frames_forwarded = self.stats.frames_forwarded,
            frames_dropped = self.stats.frames_dropped,
            restarts = self.stats.restarts,
            channel_failures = self.stats.channel_failures,
            translation_failures = self.stats.translation_failures,
            "Session closed after {:.1}s ({} transcripts)",
            self.stats.duration_secs,
            self.stats.transcripts_sent
        );

        self.stats
    }
}

const CHANNEL_ENDED: &str = "recognition channel ended";

/// Next update from the open channel; pending forever when there is none
async fn next_update(state: &mut SessionState) -> Option<RecognitionUpdate> {
    match state {
        SessionState::Streaming {
            channel: Some(channel),
            ..
        } => channel.next_update().await,
        _ => std::future::pending().await,
    }
}
