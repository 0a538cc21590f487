use super::types::RecognitionEvent;
use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Output of a recognition channel
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionUpdate {
    /// An incremental (interim or final) hypothesis
    Event(RecognitionEvent),
    /// Fatal channel error; no further updates follow
    Failed(String),
}

/// Returned when writing to a channel whose gateway side has gone away
#[derive(Debug, thiserror::Error)]
#[error("recognition channel {0} is closed")]
pub struct ChannelClosed(pub Uuid);

/// Owned handle to one open recognition stream
///
/// Audio goes in through a bounded queue, so a slow gateway applies
/// back-pressure to `write`. Updates come out of `next_update` in the order
/// the gateway produced them.
pub struct RecognitionChannel {
    // Field order matters: the update receiver is dropped before anything else
    events: mpsc::Receiver<RecognitionUpdate>,
    audio_tx: mpsc::Sender<Bytes>,
    listener: Option<JoinHandle<()>>,
    id: Uuid,
}

impl RecognitionChannel {
    pub fn new(
        id: Uuid,
        audio_tx: mpsc::Sender<Bytes>,
        events: mpsc::Receiver<RecognitionUpdate>,
    ) -> Self {
        Self {
            events,
            audio_tx,
            listener: None,
            id,
        }
    }

    /// Attach the task delivering updates; it is aborted when the channel closes
    pub fn with_listener(mut self, listener: JoinHandle<()>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Write one audio frame verbatim
    pub async fn write(&self, frame: Bytes) -> Result<(), ChannelClosed> {
        self.audio_tx
            .send(frame)
            .await
            .map_err(|_| ChannelClosed(self.id))
    }

    /// Next update, or `None` once the gateway side has ended the stream
    pub async fn next_update(&mut self) -> Option<RecognitionUpdate> {
        self.events.recv().await
    }

    /// Detach all listeners, then end the audio stream
    ///
    /// After this returns no update from this channel can be observed.
    pub fn close(mut self) {
        self.events.close();
        debug!("Closing recognition channel {}", self.id);
    }
}

impl Drop for RecognitionChannel {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}
