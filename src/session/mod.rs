//! Session relay
//!
//! One [`SessionRelay`] per client connection:
//! - accepts the `config` handshake and synthesizes the recognizer configuration
//! - forwards PCM frames to the open recognition channel
//! - restarts the channel when a new handshake arrives
//! - shapes recognition events into client messages, translating final text
//! - tracks per-session statistics

mod config;
mod session;
mod shaping;
mod stats;

pub use config::{Handshake, HandshakeError, RecognitionDefaults, SessionParams, TranslateChoice};
pub use session::SessionRelay;
pub use shaping::transcript_message;
pub use stats::SessionStats;
