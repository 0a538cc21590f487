//! NATS transport for the recognition and translation gateways
//!
//! Subjects (prefixes are configurable):
//! - `stt.recognize.open`: stream open requests
//! - `stt.recognize.audio.<channel>`: base64 PCM frames
//! - `stt.results.<channel>`: recognition responses
//! - `translate.text`: translation request/reply

pub mod client;
mod gateway;
pub mod messages;

pub use client::NatsClient;
pub use messages::{AudioFrameMessage, StreamingRecognizeRequest, StreamingRecognizeResponse};
