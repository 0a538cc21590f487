//! Contracts for the external speech services
//!
//! The relay never talks to a recognition or translation engine directly.
//! It consumes two capabilities:
//! - [`RecognitionGateway`]: opens one duplex [`RecognitionChannel`] per active
//!   configuration (audio in, incremental [`RecognitionUpdate`]s out)
//! - [`TranslationGateway`]: translates one finalized text span
//!
//! The production implementations live in [`crate::nats`]. Tests supply
//! in-memory fakes.

mod channel;
mod types;

pub use channel::{ChannelClosed, RecognitionChannel, RecognitionUpdate};
pub use types::{
    AudioEncoding, DiarizationConfig, RecognitionEvent, RecognizedWord,
    StreamingRecognitionConfig,
};

use anyhow::Result;

/// Streaming speech recognition capability
#[async_trait::async_trait]
pub trait RecognitionGateway: Send + Sync {
    /// Open a new recognition channel for the given configuration
    ///
    /// The returned channel is exclusively owned by the caller. Dropping or
    /// closing it releases every resource the gateway allocated for it.
    async fn open(&self, config: StreamingRecognitionConfig) -> Result<RecognitionChannel>;

    /// Gateway name for logging
    fn name(&self) -> &str;
}

/// Text translation capability
#[async_trait::async_trait]
pub trait TranslationGateway: Send + Sync {
    /// Translate `text` into `target_language_code`
    async fn translate(&self, text: &str, target_language_code: &str) -> Result<String>;
}
