use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::SessionConfiguration;
use super::session::SessionState;

/// Snapshot of a conversation session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: String,

    /// Current lifecycle state
    pub state: SessionState,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// Confirmed languages, once the session has left `Configuring`
    pub configuration: Option<SessionConfiguration>,

    /// Turns in the current (not yet exported) log segment
    pub pending_turns: usize,

    /// Turns completed over the whole session, including exported ones
    pub total_turns: usize,

    /// Turns aborted by a pipeline failure
    pub failed_turns: usize,

    /// Number of transcripts exported so far
    pub exports: usize,
}
