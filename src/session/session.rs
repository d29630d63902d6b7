use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use super::config::{LanguageSelection, SessionConfiguration};
use super::export::ConversationExport;
use super::log::{ConversationLog, Speaker};
use super::stats::SessionStats;
use crate::error::{ConversationError, Result};
use crate::language::LanguageCode;
use crate::pipeline::{SpeechSource, TurnOutcome, TurnPipeline};

/// Lifecycle of a conversation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for languages to be confirmed
    Configuring,
    /// Turns may be taken
    Active,
    /// Conversation ended and its log exported; may be started again
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Configuring => "configuring",
            SessionState::Active => "active",
            SessionState::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// A two-party translated conversation
///
/// Owned by a single caller; every operation takes `&mut self`, so turns are
/// strictly sequential and the log has exactly one writer.
pub struct ConversationSession {
    /// Session identifier
    session_id: String,

    /// Steps run for each turn
    pipeline: TurnPipeline,

    state: SessionState,

    /// Set exactly once, when leaving `Configuring`
    configuration: Option<SessionConfiguration>,

    /// Turns since the last export
    log: ConversationLog,

    /// When the session was created
    created_at: DateTime<Utc>,

    total_turns: usize,
    failed_turns: usize,
    exports: usize,
}

impl ConversationSession {
    /// Create a session in `Configuring`
    pub fn new(session_id: impl Into<String>, pipeline: TurnPipeline) -> Self {
        let session_id = session_id.into();
        info!("Creating conversation session: {}", session_id);

        Self {
            session_id,
            pipeline,
            state: SessionState::Configuring,
            configuration: None,
            log: ConversationLog::new(),
            created_at: Utc::now(),
            total_turns: 0,
            failed_turns: 0,
            exports: 0,
        }
    }

    /// Create a session with a generated `conversation-<uuid>` identifier
    pub fn with_generated_id(pipeline: TurnPipeline) -> Self {
        Self::new(format!("conversation-{}", uuid::Uuid::new_v4()), pipeline)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn configuration(&self) -> Option<&SessionConfiguration> {
        self.configuration.as_ref()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    fn require(&self, expected: SessionState, operation: &'static str) -> Result<()> {
        if self.state != expected {
            warn!(
                "Rejected {} on session {}: state is {}",
                operation, self.session_id, self.state
            );
            return Err(ConversationError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Confirm the language selection and move to `Active`.
    ///
    /// On `UnknownLanguage` the session stays in `Configuring` with nothing set.
    pub fn confirm(&mut self, selection: &LanguageSelection) -> Result<&SessionConfiguration> {
        self.require(SessionState::Configuring, "confirm languages")?;

        let configuration = selection.confirm()?;
        self.state = SessionState::Active;
        info!("Session {} is active", self.session_id);

        Ok(&*self.configuration.insert(configuration))
    }

    /// Resume a conversation under the confirmed languages
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            SessionState::Configuring => {
                warn!(
                    "Rejected start conversation on session {}: languages not confirmed",
                    self.session_id
                );
                Err(ConversationError::InvalidState {
                    operation: "start conversation",
                    state: self.state,
                })
            }
            SessionState::Active => {
                warn!("Conversation already started: {}", self.session_id);
                Ok(())
            }
            SessionState::Ended => {
                self.state = SessionState::Active;
                info!("Conversation started: {}", self.session_id);
                Ok(())
            }
        }
    }

    /// End the conversation, exporting and clearing its log.
    ///
    /// Returns `None` when no turns were taken since the last export.
    pub fn end(&mut self) -> Result<Option<ConversationExport>> {
        self.require(SessionState::Active, "end conversation")?;

        self.state = SessionState::Ended;

        if self.log.is_empty() {
            info!("Conversation ended with no turns: {}", self.session_id);
            return Ok(None);
        }

        let text = self.log.render();
        let turns = self.log.drain();
        self.exports += 1;

        info!(
            "Conversation ended: {} ({} turns exported)",
            self.session_id,
            turns.len()
        );

        Ok(Some(ConversationExport::new(text, turns)))
    }

    /// Run one turn with explicit language codes and log it on success.
    ///
    /// Only legal while `Active`. A pipeline failure leaves the log untouched
    /// and the session `Active`.
    pub async fn run_turn(
        &mut self,
        speaker: Speaker,
        source: &mut dyn SpeechSource,
        speak: &LanguageCode,
        output: &LanguageCode,
    ) -> Result<TurnOutcome> {
        self.require(SessionState::Active, "run a turn")?;

        match self.pipeline.run_turn(speaker, source, speak, output).await {
            Ok(outcome) => {
                self.log.append(outcome.turn.clone());
                self.total_turns += 1;
                Ok(outcome)
            }
            Err(e) => {
                self.failed_turns += 1;
                Err(e)
            }
        }
    }

    /// Run a turn for `speaker` using the confirmed languages: their spoken
    /// language in, the other party's desired language out
    pub async fn speak(
        &mut self,
        speaker: Speaker,
        source: &mut dyn SpeechSource,
    ) -> Result<TurnOutcome> {
        self.require(SessionState::Active, "run a turn")?;

        let (speak, output) = match &self.configuration {
            Some(config) => {
                let (speak, output) = config.language_pair_for(speaker);
                (speak.clone(), output.clone())
            }
            None => {
                return Err(ConversationError::InvalidState {
                    operation: "run a turn",
                    state: self.state,
                })
            }
        };

        self.run_turn(speaker, source, &speak, &output).await
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            session_id: self.session_id.clone(),
            state: self.state,
            created_at: self.created_at,
            configuration: self.configuration.clone(),
            pending_turns: self.log.len(),
            total_turns: self.total_turns,
            failed_turns: self.failed_turns,
            exports: self.exports,
        }
    }
}
