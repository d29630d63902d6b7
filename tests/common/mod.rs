// Scripted stand-ins for the speech collaborators
//
// Each fake returns a fixed answer (or a fixed failure) and records how it was
// called, so tests can check which languages reached which step.

#![allow(dead_code)]

use anyhow::Result;
use care_interpreter::{
    AudioFormat, AudioSample, LanguageCode, SpeechRecognizer, SpeechSource, SpeechSynthesizer,
    SynthesizedAudio, Translator, TurnPipeline,
};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One second of a quiet tone at 16kHz mono
pub fn speech_sample() -> AudioSample {
    let samples = (0..16000).map(|i| ((i % 50) as i16 - 25) * 40).collect();
    AudioSample::new(samples, 16000, 1)
}

/// Encode a sample as 16-bit WAV bytes
pub fn wav_bytes(sample: &AudioSample) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: sample.channels,
        sample_rate: sample.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in &sample.samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

pub struct FakeSource {
    result: Option<std::result::Result<AudioSample, String>>,
    pub requested_max: Option<Duration>,
}

impl FakeSource {
    pub fn speech() -> Self {
        Self {
            result: Some(Ok(speech_sample())),
            requested_max: None,
        }
    }

    pub fn with_sample(sample: AudioSample) -> Self {
        Self {
            result: Some(Ok(sample)),
            requested_max: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Some(Err(reason.to_string())),
            requested_max: None,
        }
    }
}

#[async_trait::async_trait]
impl SpeechSource for FakeSource {
    async fn listen(&mut self, max_duration: Duration) -> Result<AudioSample> {
        self.requested_max = Some(max_duration);
        match self.result.take() {
            Some(Ok(sample)) => Ok(sample),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
            None => anyhow::bail!("source already used"),
        }
    }

    fn name(&self) -> &str {
        "fake-source"
    }
}

pub struct FakeRecognizer {
    text: std::result::Result<String, String>,
    pub languages: Mutex<Vec<String>>,
    pub sample_lens: Mutex<Vec<usize>>,
}

impl FakeRecognizer {
    pub fn hearing(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Ok(text.to_string()),
            languages: Mutex::new(Vec::new()),
            sample_lens: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Err(reason.to_string()),
            languages: Mutex::new(Vec::new()),
            sample_lens: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.languages.lock().unwrap().clone()
    }

    /// Number of PCM samples received on each call
    pub fn heard_lens(&self) -> Vec<usize> {
        self.sample_lens.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for FakeRecognizer {
    async fn recognize(&self, audio: &AudioSample, language: &LanguageCode) -> Result<String> {
        self.languages.lock().unwrap().push(language.to_string());
        self.sample_lens.lock().unwrap().push(audio.samples.len());
        self.text.clone().map_err(|reason| anyhow::anyhow!(reason))
    }
}

pub struct FakeTranslator {
    text: std::result::Result<String, String>,
    pub pairs: Mutex<Vec<(String, String, String)>>,
}

impl FakeTranslator {
    pub fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Ok(text.to_string()),
            pairs: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            text: Err(reason.to_string()),
            pairs: Mutex::new(Vec::new()),
        })
    }

    /// (text, source, target) for each call
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.pairs.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> Result<String> {
        self.pairs
            .lock()
            .unwrap()
            .push((text.to_string(), source.to_string(), target.to_string()));
        self.text.clone().map_err(|reason| anyhow::anyhow!(reason))
    }
}

pub struct FakeSynthesizer {
    fail_with: Option<String>,
    pub produced: Mutex<Vec<PathBuf>>,
    pub languages: Mutex<Vec<String>>,
}

impl FakeSynthesizer {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            produced: Mutex::new(Vec::new()),
            languages: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(reason.to_string()),
            produced: Mutex::new(Vec::new()),
            languages: Mutex::new(Vec::new()),
        })
    }

    pub fn handles_produced(&self) -> usize {
        self.produced.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.languages.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str, language: &LanguageCode) -> Result<SynthesizedAudio> {
        self.languages.lock().unwrap().push(language.to_string());
        if let Some(reason) = &self.fail_with {
            anyhow::bail!("{}", reason);
        }
        let audio = SynthesizedAudio::from_bytes(text.as_bytes(), AudioFormat::Mp3)?;
        self.produced.lock().unwrap().push(audio.path().to_path_buf());
        Ok(audio)
    }
}

pub fn pipeline(
    recognizer: Arc<FakeRecognizer>,
    translator: Arc<FakeTranslator>,
    synthesizer: Arc<FakeSynthesizer>,
) -> TurnPipeline {
    TurnPipeline::new(recognizer, translator, synthesizer)
}

/// Pipeline whose every step succeeds
pub fn working_pipeline(heard: &str, translated: &str) -> TurnPipeline {
    pipeline(
        FakeRecognizer::hearing(heard),
        FakeTranslator::answering(translated),
        FakeSynthesizer::working(),
    )
}
