use crate::gateway::{RecognitionGateway, TranslationGateway};
use crate::session::{RecognitionDefaults, SessionRelay};
use std::sync::Arc;

/// Shared application state for HTTP handlers
///
/// Everything here is read-only; sessions share no mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Server-wide recognition defaults
    pub defaults: Arc<RecognitionDefaults>,

    /// Recognition service used to open one channel per session
    pub recognizer: Arc<dyn RecognitionGateway>,

    /// Translation service for final transcripts
    pub translator: Arc<dyn TranslationGateway>,
}

impl AppState {
    pub fn new(
        defaults: RecognitionDefaults,
        recognizer: Arc<dyn RecognitionGateway>,
        translator: Arc<dyn TranslationGateway>,
    ) -> Self {
        Self {
            defaults: Arc::new(defaults),
            recognizer,
            translator,
        }
    }

    /// Create the relay for a newly connected client
    pub fn new_session(&self) -> SessionRelay {
        SessionRelay::new(
            Arc::clone(&self.defaults),
            Arc::clone(&self.recognizer),
            Arc::clone(&self.translator),
        )
    }
}
