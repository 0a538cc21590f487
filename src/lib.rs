pub mod audio;
pub mod config;
pub mod diarization;
pub mod gateway;
pub mod http;
pub mod listen;
pub mod nats;
pub mod protocol;
pub mod session;
pub mod transcript;

pub use audio::AudioFile;
pub use config::Config;
pub use diarization::{group_by_speaker, render_blocks, SpeakerBlock};
pub use gateway::{
    RecognitionChannel, RecognitionEvent, RecognitionGateway, RecognitionUpdate,
    StreamingRecognitionConfig, TranslationGateway,
};
pub use http::{create_router, AppState};
pub use nats::NatsClient;
pub use protocol::{ClientFrame, OutboundMessage, TranscriptMessage};
pub use session::{RecognitionDefaults, SessionRelay, SessionStats};
pub use transcript::TranscriptView;
