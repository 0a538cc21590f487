// Shared fakes for relay tests
//
// The fakes stand in for the recognition and translation services so session
// behaviour can be driven deterministically without NATS.

#![allow(dead_code)]

use anyhow::Result;
use bytes::Bytes;
use futures::channel::mpsc as client_mpsc;
use futures::StreamExt;
use speech_relay::gateway::{
    RecognitionChannel, RecognitionGateway, RecognitionUpdate, StreamingRecognitionConfig,
    TranslationGateway,
};
use speech_relay::protocol::{ClientFrame, OutboundMessage};
use speech_relay::session::{RecognitionDefaults, SessionRelay, SessionStats};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const TIMEOUT: Duration = Duration::from_secs(2);

/// The gateway side of a channel opened by a session
pub struct OpenedChannel {
    pub id: Uuid,
    pub config: StreamingRecognitionConfig,
    pub audio_rx: mpsc::Receiver<Bytes>,
    pub events_tx: mpsc::Sender<RecognitionUpdate>,
}

/// Recognizer that hands every opened channel to the test
pub struct FakeRecognizer {
    opened_tx: mpsc::UnboundedSender<OpenedChannel>,
    fail_next_open: AtomicBool,
}

impl FakeRecognizer {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<OpenedChannel>) {
        let (opened_tx, opened_rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                opened_tx,
                fail_next_open: AtomicBool::new(false),
            }),
            opened_rx,
        )
    }

    pub fn fail_next_open(&self) {
        self.fail_next_open.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl RecognitionGateway for FakeRecognizer {
    async fn open(&self, config: StreamingRecognitionConfig) -> Result<RecognitionChannel> {
        if self.fail_next_open.swap(false, Ordering::SeqCst) {
            anyhow::bail!("recognizer unavailable");
        }

        let id = Uuid::new_v4();
        let (audio_tx, audio_rx) = mpsc::channel(16);
        let (events_tx, events_rx) = mpsc::channel(16);

        let _ = self.opened_tx.send(OpenedChannel {
            id,
            config,
            audio_rx,
            events_tx,
        });

        Ok(RecognitionChannel::new(id, audio_tx, events_rx))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Translator that uppercases text, or fails on demand
pub struct FakeTranslator {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<(String, String)>>,
    /// When set, every translation waits for one notification
    gate: Option<Arc<Notify>>,
}

impl FakeTranslator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Translator whose calls block until the returned gate is notified
    pub fn gated() -> (Arc<Self>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let translator = Arc::new(Self {
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: Some(gate.clone()),
        });
        (translator, gate)
    }

    /// Wait until at least `count` translations have started
    pub async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(TIMEOUT, async {
            while self.call_count() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for a translation call");
    }

    pub fn failing() -> Arc<Self> {
        let translator = Self::new();
        translator.fail.store(true, Ordering::SeqCst);
        translator
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TranslationGateway for FakeTranslator {
    async fn translate(&self, text: &str, target_language_code: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), target_language_code.to_string()));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("translation quota exceeded");
        }
        Ok(format!("[{}] {}", target_language_code, text.to_uppercase()))
    }
}

/// A running session wired to in-memory client and gateway ends
pub struct Harness {
    pub client_tx: client_mpsc::UnboundedSender<ClientFrame>,
    pub outbound_rx: client_mpsc::UnboundedReceiver<OutboundMessage>,
    pub opened_rx: mpsc::UnboundedReceiver<OpenedChannel>,
    pub recognizer: Arc<FakeRecognizer>,
    pub translator: Arc<FakeTranslator>,
    pub task: JoinHandle<SessionStats>,
}

impl Harness {
    pub fn start(defaults: RecognitionDefaults, translator: Arc<FakeTranslator>) -> Self {
        let (recognizer, opened_rx) = FakeRecognizer::new();
        let (client_tx, inbound) = client_mpsc::unbounded();
        let (outbound, outbound_rx) = client_mpsc::unbounded();

        let session = SessionRelay::new(
            Arc::new(defaults),
            recognizer.clone(),
            translator.clone(),
        );
        let task = tokio::spawn(session.run(inbound, outbound));

        Self {
            client_tx,
            outbound_rx,
            opened_rx,
            recognizer,
            translator,
            task,
        }
    }

    pub fn with_defaults() -> Self {
        Self::start(RecognitionDefaults::default(), FakeTranslator::new())
    }

    pub fn send_text(&self, text: &str) {
        self.client_tx
            .unbounded_send(ClientFrame::Text(text.to_string()))
            .expect("session inbound closed");
    }

    pub fn send_close(&self) {
        self.client_tx
            .unbounded_send(ClientFrame::Close)
            .expect("session inbound closed");
    }

    pub fn send_audio(&self, data: &'static [u8]) {
        self.client_tx
            .unbounded_send(ClientFrame::Audio(Bytes::from_static(data)))
            .expect("session inbound closed");
    }

    pub async fn next_opened(&mut self) -> OpenedChannel {
        tokio::time::timeout(TIMEOUT, self.opened_rx.recv())
            .await
            .expect("timed out waiting for a channel to open")
            .expect("recognizer dropped")
    }

    pub async fn next_outbound(&mut self) -> OutboundMessage {
        tokio::time::timeout(TIMEOUT, self.outbound_rx.next())
            .await
            .expect("timed out waiting for an outbound message")
            .expect("session closed its outbound sink")
    }

    /// Disconnect the client and collect everything the session still sent
    pub async fn disconnect(mut self) -> (SessionStats, Vec<OutboundMessage>) {
        self.client_tx.close_channel();
        let stats = tokio::time::timeout(TIMEOUT, self.task)
            .await
            .expect("session did not stop after disconnect")
            .expect("session task panicked");

        let mut remaining = Vec::new();
        while let Ok(Some(message)) = self.outbound_rx.try_next() {
            remaining.push(message);
        }
        (stats, remaining)
    }
}

pub fn config_json(language: &str, sample_rate: f64) -> String {
    serde_json::json!({
        "type": "config",
        "languageCode": language,
        "sampleRate": sample_rate,
    })
    .to_string()
}

pub fn diarized_config_json(language: &str, speaker_count: u32) -> String {
    serde_json::json!({
        "type": "config",
        "languageCode": language,
        "sampleRate": 16000,
        "diarization": true,
        "speakerCount": speaker_count,
    })
    .to_string()
}

pub fn translated_config_json(language: &str, target: &str) -> String {
    serde_json::json!({
        "type": "config",
        "languageCode": language,
        "sampleRate": 16000,
        "translateTarget": target,
    })
    .to_string()
}
