use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which party produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Patient,
    Provider,
}

impl Speaker {
    /// Label used in the transcript
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Patient => "Patient",
            Speaker::Provider => "Healthcare Provider",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One recognized and translated utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    speaker: Speaker,
    original_text: String,
    translated_text: String,
    recorded_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(
        speaker: Speaker,
        original_text: impl Into<String>,
        translated_text: impl Into<String>,
    ) -> Self {
        Self {
            speaker,
            original_text: original_text.into(),
            translated_text: translated_text.into(),
            recorded_at: Utc::now(),
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Transcript block for this turn
    pub fn render(&self) -> String {
        format!(
            "{}:\nOriginal: {}\nTranslated: {}\n",
            self.speaker, self.original_text, self.translated_text
        )
    }
}

/// Append-only record of the turns in the current conversation
///
/// Insertion order is chronological order is export order. Turns are never
/// edited or reordered once appended.
#[derive(Debug, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Plain-text transcript: one block per turn, blocks joined by a blank line.
    /// Empty log renders as the empty string.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(Turn::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Take every turn out of the log in order, leaving it empty
    pub fn drain(&mut self) -> Vec<Turn> {
        std::mem::take(&mut self.turns)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
