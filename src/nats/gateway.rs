use super::client::NatsClient;
use super::messages::{StreamingRecognizeRequest, StreamingRecognizeResponse};
use crate::gateway::{
    RecognitionChannel, RecognitionGateway, RecognitionUpdate, StreamingRecognitionConfig,
    TranslationGateway,
};
use anyhow::Result;
use bytes::Bytes;
use futures::stream::StreamExt;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

#[async_trait::async_trait]
impl RecognitionGateway for NatsClient {
    async fn open(&self, config: StreamingRecognitionConfig) -> Result<RecognitionChannel> {
        let channel_id = Uuid::new_v4();

        // Subscribe first so no early response is missed
        let mut subscriber = self.subscribe_results(channel_id).await?;
        self.publish_open(&StreamingRecognizeRequest::new(channel_id, &config))
            .await?;

        let (audio_tx, audio_rx) = mpsc::channel::<Bytes>(self.channel_capacity());
        let (events_tx, events_rx) = mpsc::channel(self.channel_capacity());

        let client = self.clone();
        tokio::spawn(pump_audio(
            channel_id,
            audio_rx,
            events_tx.clone(),
            move |sequence, frame: Bytes, last| {
                let client = client.clone();
                async move {
                    client
                        .publish_audio_frame(channel_id, sequence, &frame, last)
                        .await
                }
            },
        ));

        // Response listening task: aborted when the channel closes
        let listener = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let update = match serde_json::from_slice::<StreamingRecognizeResponse>(&msg.payload) {
                    Ok(response) => match response.into_update() {
                        Some(update) => update,
                        None => continue,
                    },
                    Err(e) => {
                        warn!("Failed to parse recognition response: {}", e);
                        continue;
                    }
                };

                let fatal = matches!(update, RecognitionUpdate::Failed(_));
                if events_tx.send(update).await.is_err() || fatal {
                    break;
                }
            }

            if let Err(e) = subscriber.unsubscribe().await {
                warn!("Failed to unsubscribe from results of {}: {}", channel_id, e);
            }
        });

        Ok(RecognitionChannel::new(channel_id, audio_tx, events_rx).with_listener(listener))
    }

    fn name(&self) -> &str {
        "nats"
    }
}

#[async_trait::async_trait]
impl TranslationGateway for NatsClient {
    async fn translate(&self, text: &str, target_language_code: &str) -> Result<String> {
        self.request_translation(text, target_language_code).await
    }
}

/// Publish queued audio frames until the channel closes, then the final marker
///
/// Closing the channel drops its update receiver, which stops the pump
/// without publishing frames still queued. A failed publish is reported as
/// `RecognitionUpdate::Failed` and ends the stream without a final marker.
async fn pump_audio<P, F>(
    channel_id: Uuid,
    mut audio_rx: mpsc::Receiver<Bytes>,
    updates: mpsc::Sender<RecognitionUpdate>,
    mut publish: P,
) where
    P: FnMut(u64, Bytes, bool) -> F,
    F: Future<Output = Result<()>>,
{
    let mut sequence = 0u64;

    loop {
        let frame = tokio::select! {
            biased;
            _ = updates.closed() => break,
            frame = audio_rx.recv() => match frame {
                Some(frame) => frame,
                None => break,
            },
        };

        if let Err(e) = publish(sequence, frame, false).await {
            error!("Failed to publish audio frame for {}: {:#}", channel_id, e);
            let _ = updates
                .send(RecognitionUpdate::Failed(format!("{:#}", e)))
                .await;
            return;
        }
        sequence += 1;
    }

    // Send final frame marker
    if let Err(e) = publish(sequence, Bytes::new(), true).await {
        warn!("Failed to publish final frame marker for {}: {:#}", channel_id, e);
    }

    info!("Audio stream {} finished after {} frames", channel_id, sequence);
}
