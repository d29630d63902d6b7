use thiserror::Error;

use crate::session::SessionState;

/// Result type for conversation operations
pub type Result<T> = std::result::Result<T, ConversationError>;

/// Every way a conversation operation can fail.
///
/// None of these are fatal to the session. A pipeline failure aborts only the
/// current turn; `UnknownLanguage` leaves the session in `Configuring`;
/// `InvalidState` means the caller invoked an operation the current state does
/// not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversationError {
    /// Language name is not in the registry
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// Operation is not legal in the session's current state
    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// No usable audio could be captured from the speech source
    #[error("could not capture audio: {0}")]
    CaptureFailed(String),

    /// Captured audio could not be turned into text
    #[error("could not recognize speech: {0}")]
    RecognitionFailed(String),

    /// Recognized text could not be translated
    #[error("translation service error: {0}")]
    TranslationFailed(String),

    /// Translated text could not be rendered as audio
    #[error("speech synthesis error: {0}")]
    SynthesisFailed(String),
}

impl ConversationError {
    /// True for the four per-step turn failures, which are worth retrying
    pub fn is_pipeline_failure(&self) -> bool {
        matches!(
            self,
            Self::CaptureFailed(_)
                | Self::RecognitionFailed(_)
                | Self::TranslationFailed(_)
                | Self::SynthesisFailed(_)
        )
    }

    /// True when the caller used the session out of order
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Short machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownLanguage(_) => "unknown_language",
            Self::InvalidState { .. } => "invalid_state",
            Self::CaptureFailed(_) => "capture_failed",
            Self::RecognitionFailed(_) => "recognition_failed",
            Self::TranslationFailed(_) => "translation_failed",
            Self::SynthesisFailed(_) => "synthesis_failed",
        }
    }
}
