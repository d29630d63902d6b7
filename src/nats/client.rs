use anyhow::{Context, Result};
use async_nats::Client;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::messages::{AudioReply, RecognizeRequest, SynthesizeRequest, TextReply, TranslateRequest};
use crate::audio::{AudioFormat, AudioSample, SynthesizedAudio};
use crate::config::SpeechConfig;
use crate::language::LanguageCode;
use crate::pipeline::{SpeechRecognizer, SpeechSynthesizer, Translator};

/// Request subjects for the three speech services
#[derive(Debug, Clone)]
pub struct ServiceSubjects {
    pub recognize: String,
    pub translate: String,
    pub synthesize: String,
}

impl From<&SpeechConfig> for ServiceSubjects {
    fn from(cfg: &SpeechConfig) -> Self {
        Self {
            recognize: cfg.recognize_subject.clone(),
            translate: cfg.translate_subject.clone(),
            synthesize: cfg.synthesize_subject.clone(),
        }
    }
}

/// Speech recognizer, translator and synthesizer reached over NATS request/reply
pub struct NatsSpeechServices {
    client: Client,
    subjects: ServiceSubjects,
    client_id: String,
}

impl NatsSpeechServices {
    /// Connect to NATS server
    pub async fn connect(url: &str, subjects: ServiceSubjects, client_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self {
            client,
            subjects,
            client_id,
        })
    }

    async fn request<Req, Rep>(&self, subject: &str, request: &Req) -> Result<Rep>
    where
        Req: Serialize + Sync,
        Rep: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request)?;

        let reply = self
            .client
            .request(subject.to_string(), payload.into())
            .await
            .with_context(|| format!("Request to {} failed", subject))?;

        debug!("Reply from {} ({} bytes)", subject, reply.payload.len());

        serde_json::from_slice(&reply.payload)
            .with_context(|| format!("Malformed reply from {}", subject))
    }
}

fn text_from(reply: TextReply, service: &str) -> Result<String> {
    if let Some(error) = reply.error {
        anyhow::bail!("{} service error: {}", service, error);
    }
    reply
        .text
        .with_context(|| format!("{} service returned no text", service))
}

#[async_trait::async_trait]
impl SpeechRecognizer for NatsSpeechServices {
    async fn recognize(&self, audio: &AudioSample, language: &LanguageCode) -> Result<String> {
        let request = RecognizeRequest {
            session_id: self.client_id.clone(),
            language: language.to_string(),
            pcm: base64::engine::general_purpose::STANDARD.encode(audio.to_pcm_bytes()),
            sample_rate: audio.sample_rate,
            channels: audio.channels,
        };

        let reply: TextReply = self.request(&self.subjects.recognize, &request).await?;
        text_from(reply, "recognition")
    }
}

#[async_trait::async_trait]
impl Translator for NatsSpeechServices {
    async fn translate(
        &self,
        text: &str,
        source: &LanguageCode,
        target: &LanguageCode,
    ) -> Result<String> {
        let request = TranslateRequest {
            session_id: self.client_id.clone(),
            text: text.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        };

        let reply: TextReply = self.request(&self.subjects.translate, &request).await?;
        text_from(reply, "translation")
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for NatsSpeechServices {
    async fn synthesize(&self, text: &str, language: &LanguageCode) -> Result<SynthesizedAudio> {
        let request = SynthesizeRequest {
            session_id: self.client_id.clone(),
            text: text.to_string(),
            language: language.to_string(),
        };

        let reply: AudioReply = self.request(&self.subjects.synthesize, &request).await?;
        if let Some(error) = reply.error {
            anyhow::bail!("synthesis service error: {}", error);
        }

        let encoded = reply.audio.context("synthesis service returned no audio")?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .context("Synthesized audio is not valid base64")?;
        let format = AudioFormat::from_name(&reply.format)
            .with_context(|| format!("Unsupported audio format: {}", reply.format))?;

        SynthesizedAudio::from_bytes(&bytes, format)
    }
}
