//! Conversation session management
//!
//! This module provides the `ConversationSession` state machine and the data
//! it owns:
//! - Language configuration confirmed once per session
//! - The conversation log of translated turns
//! - Transcript export when a conversation ends
//! - Session statistics

mod config;
mod export;
mod log;
mod session;
mod stats;

pub use config::{LanguageSelection, SessionConfiguration};
pub use export::{is_safe_file_stem, ConversationExport, EXPORT_FILE_NAME, EXPORT_MIME};
pub use log::{ConversationLog, Speaker, Turn};
pub use session::{ConversationSession, SessionState};
pub use stats::SessionStats;
