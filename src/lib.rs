pub mod audio;
pub mod config;
pub mod error;
pub mod http;
pub mod language;
pub mod nats;
pub mod pipeline;
pub mod session;

pub use audio::{AudioFormat, AudioSample, BufferedWavSource, SynthesizedAudio, WavFileSource};
pub use config::Config;
pub use error::{ConversationError, Result};
pub use http::{create_router, AppState};
pub use language::{LanguageCode, LanguageRegistry};
pub use nats::{NatsSpeechServices, ServiceSubjects};
pub use pipeline::{
    SpeechRecognizer, SpeechSource, SpeechSynthesizer, Translator, TurnOutcome, TurnPipeline,
};
pub use session::{
    ConversationExport, ConversationLog, ConversationSession, LanguageSelection,
    SessionConfiguration, SessionState, SessionStats, Speaker, Turn,
};
