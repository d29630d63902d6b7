// HTTP adapter tests, driven through the router without a network listener

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::Engine;
use care_interpreter::{create_router, AppState, TurnPipeline};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

async fn call(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, String) {
    let request = Request::builder().method(method).uri(path);

    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn call_json(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = call(app, method, path, body).await;
    let value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, value)
}

fn app_with(pipeline: TurnPipeline) -> Router {
    create_router(AppState::new(pipeline))
}

fn utterance() -> String {
    base64::engine::general_purpose::STANDARD.encode(common::wav_bytes(&common::speech_sample()))
}

fn clinic_languages() -> Value {
    json!({
        "patient_speaks": "English",
        "patient_hears": "Spanish",
        "provider_speaks": "Spanish",
        "provider_hears": "English"
    })
}

async fn active_session(app: &Router, id: &str) {
    let (status, _) = call_json(app, "POST", "/sessions", Some(json!({ "session_id": id }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call_json(
        app,
        "POST",
        &format!("/sessions/{}/confirm", id),
        Some(clinic_languages()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "active");
}

#[tokio::test]
async fn test_health_and_languages() {
    let app = app_with(common::working_pipeline("a", "b"));

    let (status, text) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");

    let (status, body) = call_json(&app, "GET", "/languages", None).await;
    assert_eq!(status, StatusCode::OK);
    let names = body.as_array().unwrap();
    assert_eq!(names.len(), 109);
    assert_eq!(names[0], "Afrikaans");
}

#[tokio::test]
async fn test_create_generates_id_and_rejects_duplicates() {
    let app = app_with(common::working_pipeline("a", "b"));

    let (status, body) = call_json(&app, "POST", "/sessions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["session_id"].as_str().unwrap().starts_with("conversation-"));
    assert_eq!(body["state"], "configuring");

    call_json(&app, "POST", "/sessions", Some(json!({ "session_id": "dup" }))).await;
    let (status, _) = call_json(&app, "POST", "/sessions", Some(json!({ "session_id": "dup" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_confirm_echoes_languages() {
    let app = app_with(common::working_pipeline("a", "b"));
    call_json(&app, "POST", "/sessions", Some(json!({ "session_id": "v1" }))).await;

    let (status, body) =
        call_json(&app, "POST", "/sessions/v1/confirm", Some(clinic_languages())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["languages"][0], "Patient Language: English (en)");
    assert_eq!(body["languages"][3], "Healthcare desired Language: English (en)");
}

#[tokio::test]
async fn test_unknown_language_is_bad_request() {
    let app = app_with(common::working_pipeline("a", "b"));
    call_json(&app, "POST", "/sessions", Some(json!({ "session_id": "v1" }))).await;

    let mut languages = clinic_languages();
    languages["provider_hears"] = json!("Dothraki");
    let (status, body) = call_json(&app, "POST", "/sessions/v1/confirm", Some(languages)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "unknown_language");

    let (_, status_body) = call_json(&app, "GET", "/sessions/v1/status", None).await;
    assert_eq!(status_body["state"], "configuring");
}

#[tokio::test]
async fn test_turn_before_confirm_is_conflict() {
    let app = app_with(common::working_pipeline("a", "b"));
    call_json(&app, "POST", "/sessions", Some(json!({ "session_id": "v1" }))).await;

    let (status, body) = call_json(
        &app,
        "POST",
        "/sessions/v1/turns",
        Some(json!({ "speaker": "patient", "audio": utterance() })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "invalid_state");
}

#[tokio::test]
async fn test_turn_returns_translation_and_audio() {
    let app = app_with(common::working_pipeline("Where does it hurt?", "¿Dónde le duele?"));
    active_session(&app, "v1").await;

    let (status, body) = call_json(
        &app,
        "POST",
        "/sessions/v1/turns",
        Some(json!({ "speaker": "patient", "audio": utterance() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["turn"]["speaker"], "patient");
    assert_eq!(body["turn"]["original_text"], "Where does it hurt?");
    assert_eq!(body["turn"]["translated_text"], "¿Dónde le duele?");
    assert_eq!(body["audio_mime"], "audio/mpeg");
    let audio = base64::engine::general_purpose::STANDARD
        .decode(body["audio"].as_str().unwrap())
        .unwrap();
    assert_eq!(audio, "¿Dónde le duele?".as_bytes());

    let (status, text) = call(&app, "GET", "/sessions/v1/transcript", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        text,
        "Patient:\nOriginal: Where does it hurt?\nTranslated: ¿Dónde le duele?\n"
    );
}

#[tokio::test]
async fn test_pipeline_failure_is_bad_gateway() {
    let pipeline = common::pipeline(
        common::FakeRecognizer::hearing("I need water"),
        common::FakeTranslator::failing("service unavailable"),
        common::FakeSynthesizer::working(),
    );
    let app = app_with(pipeline);
    active_session(&app, "v1").await;

    let (status, body) = call_json(
        &app,
        "POST",
        "/sessions/v1/turns",
        Some(json!({ "speaker": "provider", "audio": utterance() })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "translation_failed");

    let (_, stats) = call_json(&app, "GET", "/sessions/v1/status", None).await;
    assert_eq!(stats["state"], "active");
    assert_eq!(stats["pending_turns"], 0);
    assert_eq!(stats["failed_turns"], 1);
}

#[tokio::test]
async fn test_invalid_audio_upload() {
    let app = app_with(common::working_pipeline("a", "b"));
    active_session(&app, "v1").await;

    let (status, _) = call_json(
        &app,
        "POST",
        "/sessions/v1/turns",
        Some(json!({ "speaker": "patient", "audio": "%%% not base64 %%%" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let not_wav = base64::engine::general_purpose::STANDARD.encode(b"plain text");
    let (status, body) = call_json(
        &app,
        "POST",
        "/sessions/v1/turns",
        Some(json!({ "speaker": "patient", "audio": not_wav })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "capture_failed");
}

#[tokio::test]
async fn test_end_exports_and_saves_transcript() {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::new(common::working_pipeline("hello", "hola"))
        .with_export_dir(temp_dir.path().to_path_buf());
    let app = create_router(state);
    active_session(&app, "v1").await;

    call_json(
        &app,
        "POST",
        "/sessions/v1/turns",
        Some(json!({ "speaker": "patient", "audio": utterance() })),
    )
    .await;

    let (status, body) = call_json(&app, "POST", "/sessions/v1/end", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "ended");
    assert_eq!(body["transcript"], "Patient:\nOriginal: hello\nTranslated: hola\n");
    assert_eq!(body["file_name"], "conversation_log.txt");
    assert_eq!(body["mime"], "text/plain");

    let saved = body["saved_to"].as_str().unwrap();
    assert!(saved.ends_with("v1-001-conversation_log.txt"));
    assert_eq!(
        std::fs::read_to_string(saved).unwrap(),
        "Patient:\nOriginal: hello\nTranslated: hola\n"
    );

    // Log was cleared; ending again is out of order
    let (_, text) = call(&app, "GET", "/sessions/v1/transcript", None).await;
    assert_eq!(text, "");
    let (status, _) = call_json(&app, "POST", "/sessions/v1/end", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Resume under the same languages
    let (status, body) = call_json(&app, "POST", "/sessions/v1/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "active");
}

#[tokio::test]
async fn test_end_without_turns_has_no_transcript() {
    let app = app_with(common::working_pipeline("a", "b"));
    active_session(&app, "v1").await;

    let (status, body) = call_json(&app, "POST", "/sessions/v1/end", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["transcript"].is_null());
    assert!(body["saved_to"].is_null());
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app_with(common::working_pipeline("a", "b"));

    let (status, _) = call_json(&app, "POST", "/sessions/missing/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call_json(&app, "GET", "/sessions/missing/status", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_id_cannot_escape_export_dir() {
    let temp_dir = TempDir::new().unwrap();
    let export_dir = temp_dir.path().join("exports");
    let state = AppState::new(common::working_pipeline("hello", "hola"))
        .with_export_dir(export_dir.clone());
    let app = create_router(state);

    for id in ["../escaped", "a/b", "..", "a\\b", ""] {
        let (status, body) =
            call_json(&app, "POST", "/sessions", Some(json!({ "session_id": id }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?} should be rejected", id);
        assert_eq!(body["kind"], "bad_request");
    }

    let (status, _) = call_json(&app, "GET", "/sessions/..%2Fescaped/status", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nothing landed next to the export directory
    let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert!(entries.is_empty(), "Unexpected files: {:?}", entries);
}
