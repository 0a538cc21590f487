pub mod file;

pub use file::{pcm16_le_bytes, AudioFile};
