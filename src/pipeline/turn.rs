use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::traits::{SpeechRecognizer, SpeechSource, SpeechSynthesizer, Translator};
use crate::audio::SynthesizedAudio;
use crate::error::{ConversationError, Result};
use crate::language::LanguageCode;
use crate::session::{Speaker, Turn};

/// Default bound on a single capture
pub const DEFAULT_MAX_CAPTURE: Duration = Duration::from_secs(30);

/// Result of a successful turn
///
/// Logging the turn and playing the audio are left to the caller.
#[derive(Debug)]
pub struct TurnOutcome {
    pub turn: Turn,
    pub audio: SynthesizedAudio,
}

/// Capture → recognize → translate → synthesize for one utterance
#[derive(Clone)]
pub struct TurnPipeline {
    recognizer: Arc<dyn SpeechRecognizer>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    max_capture: Duration,
}

impl TurnPipeline {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            recognizer,
            translator,
            synthesizer,
            max_capture: DEFAULT_MAX_CAPTURE,
        }
    }

    /// Override the capture window
    pub fn with_max_capture(mut self, max_capture: Duration) -> Self {
        self.max_capture = max_capture;
        self
    }

    pub fn max_capture(&self) -> Duration {
        self.max_capture
    }

    /// Run all four steps in order.
    ///
    /// The first failing step aborts the turn and is reported as its own error
    /// kind. A failed turn yields neither a `Turn` nor audio.
    pub async fn run_turn(
        &self,
        speaker: Speaker,
        source: &mut dyn SpeechSource,
        speak: &LanguageCode,
        output: &LanguageCode,
    ) -> Result<TurnOutcome> {
        info!(
            "Turn started: {} via {} ({} -> {})",
            speaker,
            source.name(),
            speak,
            output
        );

        let mut audio = source.listen(self.max_capture).await.map_err(|e| {
            warn!("Capture failed: {:#}", e);
            ConversationError::CaptureFailed(format!("{:#}", e))
        })?;
        audio.truncate_to(self.max_capture);
        if audio.is_empty() {
            warn!("Capture returned no audio within {:?}", self.max_capture);
            return Err(ConversationError::CaptureFailed("no audio captured".to_string()));
        }
        info!("Captured {:.1}s of audio", audio.duration_secs());

        let original = self
            .recognizer
            .recognize(&audio, speak)
            .await
            .map_err(|e| {
                warn!("Recognition failed: {:#}", e);
                ConversationError::RecognitionFailed(format!("{:#}", e))
            })?;
        let original = original.trim();
        if original.is_empty() {
            warn!("Recognizer returned no text");
            return Err(ConversationError::RecognitionFailed(
                "no speech recognized".to_string(),
            ));
        }
        info!("Recognized ({}): {}", speak, original);

        let translated = self
            .translator
            .translate(original, speak, output)
            .await
            .map_err(|e| {
                warn!("Translation failed: {:#}", e);
                ConversationError::TranslationFailed(format!("{:#}", e))
            })?;
        info!("Translated ({}): {}", output, translated);

        let audio = self
            .synthesizer
            .synthesize(&translated, output)
            .await
            .map_err(|e| {
                warn!("Synthesis failed: {:#}", e);
                ConversationError::SynthesisFailed(format!("{:#}", e))
            })?;

        info!("Turn complete: {}", speaker);

        Ok(TurnOutcome {
            turn: Turn::new(speaker, original, translated),
            audio,
        })
    }
}
