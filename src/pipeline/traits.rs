use anyhow::Result;
use std::time::Duration;

use crate::audio::{AudioSample, SynthesizedAudio};
use crate::language::LanguageCode;

/// Where a turn's speech comes from
///
/// Implementations:
/// - `WavFileSource`: a recorded WAV file on disk
/// - `BufferedWavSource`: WAV bytes already in memory (e.g. an HTTP upload)
#[async_trait::async_trait]
pub trait SpeechSource: Send {
    /// Capture one utterance, at most `max_duration` long.
    ///
    /// May wait as long as the source needs (microphone, upload).
    async fn listen(&mut self, max_duration: Duration) -> Result<AudioSample>;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Speech-to-text engine
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe `audio`, expecting speech in `language`
    async fn recognize(&self, audio: &AudioSample, language: &LanguageCode) -> Result<String>;
}

/// Machine translation engine
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> Result<String>;
}

/// Text-to-speech engine
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render `text` as speech in `language`.
    ///
    /// On error no handle may be left behind.
    async fn synthesize(&self, text: &str, language: &LanguageCode) -> Result<SynthesizedAudio>;
}
