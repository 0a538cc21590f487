use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Counters describing one relay session, logged when it closes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Session identifier (one per client connection)
    pub session_id: Uuid,

    /// When the client connected
    pub started_at: DateTime<Utc>,

    /// Session lifetime in seconds, filled in on close
    pub duration_secs: f64,

    /// Audio frames written to a recognition channel
    pub frames_forwarded: u64,

    /// Audio frames discarded because no channel was open
    pub frames_dropped: u64,

    /// Transcript messages delivered to the client
    pub transcripts_sent: u64,

    /// Number of times a new handshake replaced an open channel
    pub restarts: u64,

    /// Recognition channel failures reported to the client
    pub channel_failures: u64,

    /// Translation calls that failed and were absorbed
    pub translation_failures: u64,
}

impl SessionStats {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            started_at: Utc::now(),
            duration_secs: 0.0,
            frames_forwarded: 0,
            frames_dropped: 0,
            transcripts_sent: 0,
            restarts: 0,
            channel_failures: 0,
            translation_failures: 0,
        }
    }

    /// Stamp the session duration
    pub fn finish(&mut self) {
        let duration = Utc::now().signed_duration_since(self.started_at);
        self.duration_secs = duration.num_milliseconds() as f64 / 1000.0;
    }
}
