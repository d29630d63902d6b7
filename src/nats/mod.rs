pub mod client;
pub mod messages;

pub use client::{NatsSpeechServices, ServiceSubjects};
pub use messages::{AudioReply, RecognizeRequest, SynthesizeRequest, TextReply, TranslateRequest};
