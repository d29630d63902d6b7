use anyhow::{Context, Result};
use hound::WavReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use super::sample::AudioSample;
use crate::pipeline::SpeechSource;

/// Decode 16-bit PCM WAV bytes into a sample, rejecting empty or silent audio
pub fn decode_wav(bytes: &[u8]) -> Result<AudioSample> {
    let reader = WavReader::new(Cursor::new(bytes)).context("Failed to parse WAV data")?;

    let spec = reader.spec();
    let samples: Vec<i16> = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read audio samples")?;

    let sample = AudioSample::new(samples, spec.sample_rate, spec.channels);

    if sample.is_empty() {
        anyhow::bail!("no audio captured");
    }
    if sample.is_silent() {
        anyhow::bail!("only silence captured");
    }

    Ok(sample)
}

/// Reads an utterance from a WAV file on disk
pub struct WavFileSource {
    path: PathBuf,
    name: String,
}

impl WavFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("wav-file:{}", path.display());
        Self { path, name }
    }
}

#[async_trait::async_trait]
impl SpeechSource for WavFileSource {
    async fn listen(&mut self, max_duration: Duration) -> Result<AudioSample> {
        info!("Opening audio file: {}", self.path.display());

        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut sample = decode_wav(&bytes)?;
        sample.truncate_to(max_duration);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels",
            sample.duration_secs(),
            sample.sample_rate,
            sample.channels
        );

        Ok(sample)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// WAV bytes already in memory, captured once
pub struct BufferedWavSource {
    bytes: Option<Vec<u8>>,
}

impl BufferedWavSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes: Some(bytes) }
    }
}

#[async_trait::async_trait]
impl SpeechSource for BufferedWavSource {
    async fn listen(&mut self, max_duration: Duration) -> Result<AudioSample> {
        let bytes = self
            .bytes
            .take()
            .context("audio buffer already consumed")?;

        let mut sample = decode_wav(&bytes)?;
        sample.truncate_to(max_duration);
        Ok(sample)
    }

    fn name(&self) -> &str {
        "buffered-wav"
    }
}
