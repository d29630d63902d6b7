use serde::{Deserialize, Serialize};

/// Recognition request sent to the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognizeRequest {
    pub session_id: String,
    pub language: String,
    pub pcm: String, // Base64-encoded PCM bytes
    pub sample_rate: u32,
    pub channels: u16,
}

/// Translation request sent to the MT service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub session_id: String,
    pub text: String,
    pub source: String,
    pub target: String,
}

/// Synthesis request sent to the TTS service
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub session_id: String,
    pub text: String,
    pub language: String,
}

/// Reply carrying text (recognition and translation)
#[derive(Debug, Serialize, Deserialize)]
pub struct TextReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply carrying synthesized audio
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioReply {
    #[serde(default)]
    pub audio: Option<String>, // Base64-encoded audio bytes
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_format() -> String {
    "mp3".to_string()
}
