use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::debug;

/// Captured speech (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioSample {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

impl AudioSample {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when every sample is zero
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0)
    }

    /// Cut the sample down to at most `max` of audio, keeping whole frames
    pub fn truncate_to(&mut self, max: Duration) {
        let frames = (max.as_secs_f64() * self.sample_rate as f64) as usize;
        let limit = frames * self.channels as usize;
        if self.samples.len() > limit {
            debug!(
                "Capture truncated from {:.1}s to {:.1}s",
                self.duration_secs(),
                max.as_secs_f64()
            );
            self.samples.truncate(limit);
        }
    }

    /// Little-endian PCM bytes
    pub fn to_pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Container format of synthesized speech
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    /// Parse a format name as reported by a synthesizer ("mp3", "wav")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mp3" | "mpeg" | "audio/mpeg" => Some(Self::Mp3),
            "wav" | "wave" | "audio/wav" => Some(Self::Wav),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
        }
    }
}

/// Playable synthesized speech for one turn
///
/// Backed by a temporary file that is removed when the handle is released or
/// dropped, so a handle can never outlive its playback.
#[derive(Debug)]
pub struct SynthesizedAudio {
    file: NamedTempFile,
    format: AudioFormat,
}

impl SynthesizedAudio {
    /// Store synthesized bytes in a fresh temporary file
    pub fn from_bytes(bytes: &[u8], format: AudioFormat) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("turn-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()
            .context("Failed to create temporary audio file")?;

        file.write_all(bytes)
            .context("Failed to write synthesized audio")?;
        file.flush().context("Failed to flush synthesized audio")?;

        debug!(
            "Synthesized audio stored: {} ({} bytes)",
            file.path().display(),
            bytes.len()
        );

        Ok(Self { file, format })
    }

    /// Location a player can open while the handle is alive
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        std::fs::read(self.file.path()).context("Failed to read synthesized audio")
    }

    /// Delete the backing file now, reporting any failure
    pub fn release(self) -> Result<()> {
        let path = self.file.path().to_path_buf();
        self.file
            .close()
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        debug!("Synthesized audio released: {}", path.display());
        Ok(())
    }
}
