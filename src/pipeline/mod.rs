//! Per-utterance translation pipeline
//!
//! The core never talks to a microphone or a speech service directly. It
//! drives four collaborators through the traits in this module, one step each,
//! and turns whatever goes wrong into a failure tied to that step.

mod traits;
mod turn;

pub use traits::{SpeechRecognizer, SpeechSource, SpeechSynthesizer, Translator};
pub use turn::{TurnOutcome, TurnPipeline, DEFAULT_MAX_CAPTURE};
