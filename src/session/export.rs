use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::log::Turn;

/// Suggested download name for an exported transcript
pub const EXPORT_FILE_NAME: &str = "conversation_log.txt";

/// MIME type of an exported transcript
pub const EXPORT_MIME: &str = "text/plain";

/// True when `stem` is usable as part of an export file name: non-empty, at
/// most 128 characters, only ASCII letters, digits, `-` and `_`
pub fn is_safe_file_stem(stem: &str) -> bool {
    !stem.is_empty()
        && stem.len() <= 128
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Transcript produced when a conversation ends
#[derive(Debug, Clone, Serialize)]
pub struct ConversationExport {
    /// Rendered UTF-8 transcript
    pub text: String,

    /// The turns that were drained from the log, in order
    pub turns: Vec<Turn>,
}

impl ConversationExport {
    pub fn new(text: String, turns: Vec<Turn>) -> Self {
        Self { text, turns }
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn file_name(&self) -> &'static str {
        EXPORT_FILE_NAME
    }

    pub fn mime(&self) -> &'static str {
        EXPORT_MIME
    }

    /// Write the transcript to `<dir>/<stem>-conversation_log.txt`.
    ///
    /// `stem` must pass [`is_safe_file_stem`], so the file always lands
    /// directly inside `dir`.
    pub fn write_to(&self, dir: impl AsRef<Path>, stem: &str) -> Result<PathBuf> {
        if !is_safe_file_stem(stem) {
            anyhow::bail!("Refusing to export transcript under unsafe name {:?}", stem);
        }

        let dir = dir.as_ref();
        fs::create_dir_all(dir).context("Failed to create export directory")?;

        let path = dir.join(format!("{}-{}", stem, EXPORT_FILE_NAME));
        fs::write(&path, self.text.as_bytes())
            .with_context(|| format!("Failed to write transcript to {}", path.display()))?;

        info!(
            "Transcript exported: {} ({} turns)",
            path.display(),
            self.turns.len()
        );

        Ok(path)
    }
}
