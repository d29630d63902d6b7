//! HTTP API for the presentation layer
//!
//! Each route maps one UI action onto a `ConversationSession` call:
//! - POST /sessions - Create a session
//! - POST /sessions/:id/confirm - Confirm languages
//! - POST /sessions/:id/start - Resume the conversation
//! - POST /sessions/:id/end - End and export the transcript
//! - POST /sessions/:id/turns - Translate one utterance
//! - GET /sessions/:id/status - Query session status
//! - GET /sessions/:id/transcript - Current transcript
//! - GET /languages - Selectable languages
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
