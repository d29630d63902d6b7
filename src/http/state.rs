use crate::pipeline::TurnPipeline;
use crate::session::ConversationSession;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Conversation sessions (session_id → session). Each session sits behind
    /// its own mutex, so a session runs at most one turn at a time.
    pub sessions: Arc<RwLock<HashMap<String, Arc<Mutex<ConversationSession>>>>>,

    /// Pipeline handed to every new session
    pub pipeline: TurnPipeline,

    /// Where ended conversations are written, if anywhere
    pub export_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(pipeline: TurnPipeline) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            pipeline,
            export_dir: None,
        }
    }

    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = Some(dir);
        self
    }

    pub async fn session(&self, session_id: &str) -> Option<Arc<Mutex<ConversationSession>>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }
}
