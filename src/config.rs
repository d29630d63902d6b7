use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub capture: CaptureConfig,
    pub speech: SpeechConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    /// Longest utterance accepted per turn
    pub max_duration_secs: u64,
}

impl CaptureConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct SpeechConfig {
    pub nats_url: String,
    pub recognize_subject: String,
    pub translate_subject: String,
    pub synthesize_subject: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportConfig {
    /// Where ended conversations are written; not written when unset
    pub directory: Option<String>,
}

impl ExportConfig {
    /// Export directory with `~` and environment variables expanded
    pub fn directory(&self) -> Result<Option<PathBuf>> {
        match &self.directory {
            Some(dir) => Ok(Some(PathBuf::from(shellexpand::full(dir)?.into_owned()))),
            None => Ok(None),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CARE_INTERPRETER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
