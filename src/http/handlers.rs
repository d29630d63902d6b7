use super::state::AppState;
use crate::audio::BufferedWavSource;
use crate::error::ConversationError;
use crate::language::LanguageRegistry;
use crate::session::{
    is_safe_file_stem, ConversationSession, LanguageSelection, SessionState, SessionStats,
    Speaker, Turn, EXPORT_FILE_NAME, EXPORT_MIME,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Optional session ID (if not provided, generate UUID)
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub state: SessionState,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub session_id: String,
    pub state: SessionState,
    /// `Label: Name (code)` for each confirmed language
    pub languages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EndResponse {
    pub session_id: String,
    pub state: SessionState,
    /// Exported transcript; absent when no turns were taken
    pub transcript: Option<String>,
    pub file_name: &'static str,
    pub mime: &'static str,
    /// Where the transcript was written, when an export directory is configured
    pub saved_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub speaker: Speaker,
    /// Base64-encoded WAV recording of the utterance
    pub audio: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub turn: Turn,
    /// Base64-encoded synthesized speech
    pub audio: String,
    pub audio_mime: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

// ============================================================================
// Error mapping
// ============================================================================

fn conversation_error(session_id: &str, e: ConversationError) -> Response {
    let status = match &e {
        ConversationError::UnknownLanguage(_) => StatusCode::BAD_REQUEST,
        ConversationError::InvalidState { .. } => StatusCode::CONFLICT,
        _ => StatusCode::BAD_GATEWAY,
    };

    if e.is_pipeline_failure() {
        warn!("Turn failed for session {}: {}", session_id, e);
    } else {
        error!("Session {} rejected request: {}", session_id, e);
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            kind: e.kind().to_string(),
        }),
    )
        .into_response()
}

fn not_found(session_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
            kind: "not_found".to_string(),
        }),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message,
            kind: "bad_request".to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /languages
/// Language names in presentation order
pub async fn list_languages() -> impl IntoResponse {
    Json(LanguageRegistry::list_names())
}

/// POST /sessions
/// Create a session waiting for language confirmation
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    let session = match req.session_id {
        Some(id) if !is_safe_file_stem(&id) => {
            return bad_request(format!(
                "Invalid session id {:?}: use 1-128 letters, digits, '-' or '_'",
                id
            ));
        }
        Some(id) => ConversationSession::new(id, state.pipeline.clone()),
        None => ConversationSession::with_generated_id(state.pipeline.clone()),
    };
    let session_id = session.session_id().to_string();

    let mut sessions = state.sessions.write().await;
    if sessions.contains_key(&session_id) {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Session {} already exists", session_id),
                kind: "conflict".to_string(),
            }),
        )
            .into_response();
    }
    sessions.insert(session_id.clone(), Arc::new(Mutex::new(session)));

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            state: SessionState::Configuring,
            message: "Select languages to begin".to_string(),
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/confirm
/// Confirm the four languages and activate the conversation
pub async fn confirm_languages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(selection): Json<LanguageSelection>,
) -> Response {
    let Some(session) = state.session(&session_id).await else {
        return not_found(&session_id);
    };
    let mut session = session.lock().await;

    match session.confirm(&selection) {
        Ok(configuration) => {
            let languages = configuration.describe();
            (
                StatusCode::OK,
                Json(ConfirmResponse {
                    session_id: session_id.clone(),
                    state: session.state(),
                    languages,
                }),
            )
                .into_response()
        }
        Err(e) => conversation_error(&session_id, e),
    }
}

/// POST /sessions/:session_id/start
/// Resume a conversation after it was ended
pub async fn start_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(session) = state.session(&session_id).await else {
        return not_found(&session_id);
    };
    let mut session = session.lock().await;

    match session.start() {
        Ok(()) => (
            StatusCode::OK,
            Json(SessionResponse {
                session_id: session_id.clone(),
                state: session.state(),
                message: "Conversation started".to_string(),
            }),
        )
            .into_response(),
        Err(e) => conversation_error(&session_id, e),
    }
}

/// POST /sessions/:session_id/end
/// End the conversation and export its transcript
pub async fn end_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(session) = state.session(&session_id).await else {
        return not_found(&session_id);
    };
    let mut session = session.lock().await;

    let export = match session.end() {
        Ok(export) => export,
        Err(e) => return conversation_error(&session_id, e),
    };

    let mut saved_to = None;
    if let (Some(export), Some(dir)) = (&export, &state.export_dir) {
        let stem = format!("{}-{:03}", session_id, session.stats().exports);
        match export.write_to(dir, &stem) {
            Ok(path) => saved_to = Some(path.display().to_string()),
            Err(e) => error!("Failed to save transcript for {}: {:#}", session_id, e),
        }
    }

    info!("Conversation ended for session: {}", session_id);

    (
        StatusCode::OK,
        Json(EndResponse {
            session_id: session_id.clone(),
            state: session.state(),
            transcript: export.map(|e| e.text),
            file_name: EXPORT_FILE_NAME,
            mime: EXPORT_MIME,
            saved_to,
        }),
    )
        .into_response()
}

/// POST /sessions/:session_id/turns
/// Translate one uploaded utterance
pub async fn take_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<TurnRequest>,
) -> Response {
    let Some(session) = state.session(&session_id).await else {
        return not_found(&session_id);
    };

    let wav = match base64::engine::general_purpose::STANDARD.decode(&req.audio) {
        Ok(bytes) => bytes,
        Err(e) => return bad_request(format!("Audio is not valid base64: {}", e)),
    };
    let mut source = BufferedWavSource::new(wav);

    let outcome = {
        let mut session = session.lock().await;
        match session.speak(req.speaker, &mut source).await {
            Ok(outcome) => outcome,
            Err(e) => return conversation_error(&session_id, e),
        }
    };

    let audio_mime = outcome.audio.format().mime();
    let bytes = outcome.audio.read_bytes();
    if let Err(e) = outcome.audio.release() {
        warn!("Failed to release synthesized audio: {:#}", e);
    }

    match bytes {
        Ok(bytes) => (
            StatusCode::OK,
            Json(TurnResponse {
                turn: outcome.turn,
                audio: base64::engine::general_purpose::STANDARD.encode(bytes),
                audio_mime,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to read synthesized audio: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to read synthesized audio: {}", e),
                    kind: "internal".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions/:session_id/status
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.session(&session_id).await {
        Some(session) => {
            let stats: SessionStats = session.lock().await.stats();
            (StatusCode::OK, Json(stats)).into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /sessions/:session_id/transcript
/// Current transcript as plain text, without clearing it
pub async fn get_session_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.session(&session_id).await {
        Some(session) => {
            let text = session.lock().await.log().render();
            (
                StatusCode::OK,
                [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                text,
            )
                .into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
