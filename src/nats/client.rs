use super::messages::{
    AudioFrameMessage, StreamingRecognizeRequest, TranslateReply, TranslateRequest,
};
use crate::config::NatsConfig;
use anyhow::{Context, Result};
use async_nats::Client;
use base64::Engine;
use tracing::{debug, info};
use uuid::Uuid;

/// NATS connection shared by every session's gateway calls
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
    recognize_subject: String,
    results_subject: String,
    translate_subject: String,
    channel_capacity: usize,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(config: &NatsConfig) -> Result<Self> {
        info!("Connecting to NATS at {}", config.url);

        let client = async_nats::connect(config.url.as_str())
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            recognize_subject: config.recognize_subject.clone(),
            results_subject: config.results_subject.clone(),
            translate_subject: config.translate_subject.clone(),
            channel_capacity: config.channel_capacity.max(1),
        })
    }

    /// Bound on queued audio frames and undelivered updates per channel
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Ask the recognizer to open a stream for `request.channel_id`
    pub async fn publish_open(&self, request: &StreamingRecognizeRequest) -> Result<()> {
        let subject = format!("{}.open", self.recognize_subject);
        let payload = serde_json::to_vec(request)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish recognize request")?;

        info!(
            "Requested recognition stream {} on {} ({}Hz, {})",
            request.channel_id,
            subject,
            request.streaming_config.config.sample_rate_hertz,
            request.streaming_config.config.language_code
        );

        Ok(())
    }

    /// Publish audio frame to NATS
    pub async fn publish_audio_frame(
        &self,
        channel_id: Uuid,
        sequence: u64,
        pcm_bytes: &[u8],
        is_final: bool,
    ) -> Result<()> {
        let subject = format!("{}.audio.{}", self.recognize_subject, channel_id);

        let message = AudioFrameMessage {
            channel_id,
            sequence,
            pcm: base64::engine::general_purpose::STANDARD.encode(pcm_bytes),
            final_frame: is_final,
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish audio frame")?;

        debug!(
            "Published audio frame to {} (seq={}, bytes={}, final={})",
            subject,
            sequence,
            pcm_bytes.len(),
            is_final
        );

        Ok(())
    }

    /// Subscribe to recognition responses for one channel
    pub async fn subscribe_results(&self, channel_id: Uuid) -> Result<async_nats::Subscriber> {
        let subject = format!("{}.{}", self.results_subject, channel_id);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to recognition results")?;

        debug!("Subscribed to {}", subject);

        Ok(subscriber)
    }

    /// Translate one text span via request/reply
    pub async fn request_translation(&self, text: &str, target_language_code: &str) -> Result<String> {
        let request = TranslateRequest {
            text: text.to_string(),
            target_language_code: target_language_code.to_string(),
        };
        let payload = serde_json::to_vec(&request)?;

        let reply = self
            .client
            .request(self.translate_subject.clone(), payload.into())
            .await
            .context("Translation request failed")?;

        let reply: TranslateReply =
            serde_json::from_slice(&reply.payload).context("Invalid translation reply")?;

        match (reply.translated_text, reply.error) {
            (_, Some(error)) => anyhow::bail!("Translation service error: {}", error),
            (Some(text), None) => Ok(text),
            (None, None) => anyhow::bail!("Translation reply carried no text"),
        }
    }
}
