//! Axum route handlers for the screening chat.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::fixtures::generate_dummy_candidate;
use crate::models::candidate::{AnonymizedRecord, CandidateForm, CandidateProfile};
use crate::models::conversation::ConversationTurn;
use crate::screening::conversation::is_exit_keyword;
use crate::sessions::Session;
use crate::state::AppState;

const EMPTY_MESSAGE: &str = "Please type something or use the candidate form.";
const DUMMY_FILLED: &str = "Filled candidate form with dummy data (for testing).";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub candidate: CandidateProfile,
    pub messages: Vec<ConversationTurn>,
    pub questions: Vec<String>,
}

impl SessionView {
    fn of(session_id: Uuid, session: &Session) -> Self {
        Self {
            session_id,
            candidate: session.candidate.clone(),
            messages: session.messages.clone(),
            questions: session.conversation.last_generated_questions().to_vec(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub reply: String,
    /// Local path of the record saved for this message, if any.
    pub saved_to: Option<String>,
    pub uploaded: bool,
    pub session_complete: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let session_id = state.sessions.create(state.provider.clone()).await;
    info!("Session {session_id} created");
    (StatusCode::CREATED, Json(SessionCreatedResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(SessionView::of(id, &session)))
}

/// PUT /api/v1/sessions/:id/candidate
///
/// Replaces the candidate wholesale with the submitted form and greets them.
/// Unknown sessions are reported before the form is validated.
pub async fn handle_submit_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<CandidateForm>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let profile = form.into_profile(Utc::now())?;
    let mut session = session.lock().await;

    session.push_user(format!("Candidate registered: {}", profile.display_name()));
    session.candidate = profile;
    let greeting = session.conversation.greeting();
    session.push_assistant(greeting);

    Ok(Json(SessionView::of(id, &session)))
}

/// POST /api/v1/sessions/:id/candidate/dummy
pub async fn handle_dummy_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut session = session.lock().await;

    session.candidate = generate_dummy_candidate();
    session.push_assistant(DUMMY_FILLED);

    Ok(Json(SessionView::of(id, &session)))
}

/// POST /api/v1/sessions/:id/messages
///
/// Routes one chat message. When it produces a question set, the anonymized
/// candidate plus exactly that set is saved locally and offered to blob storage.
/// An exit keyword ends the session and removes it from the registry.
pub async fn handle_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = find_session(&state, id).await?;

    let message = request.message;
    if message.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_MESSAGE.to_string()));
    }

    let mut guard = session.lock().await;
    let session = &mut *guard;

    session.push_user(message.as_str());

    if is_exit_keyword(&message) {
        let farewell = session.conversation.farewell();
        session.push_assistant(farewell);
        drop(guard);
        state.sessions.remove(id).await;
        info!("Session {id} completed");
        return Ok(Json(MessageResponse {
            reply: farewell.to_string(),
            saved_to: None,
            uploaded: false,
            session_complete: true,
        }));
    }

    let reply = session
        .conversation
        .handle(&message, &session.candidate)
        .await;
    session.push_assistant(reply.text.as_str());

    let questions = session.conversation.last_generated_questions();
    let (saved_to, uploaded) = if reply.generated && !questions.is_empty() {
        let record = AnonymizedRecord::new(&session.candidate, questions);
        let path = state.storage.save_local(&record).await?;
        let uploaded = state.storage.try_upload(&record).await;
        (Some(path.display().to_string()), uploaded)
    } else {
        (None, false)
    };

    Ok(Json(MessageResponse {
        reply: reply.text,
        saved_to,
        uploaded,
        session_complete: false,
    }))
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Mutex<Session>>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::ProviderSettings;
    use crate::llm_client::ProviderClient;
    use crate::models::candidate::{REDACTED_EMAIL, REDACTED_PHONE};
    use crate::routes::build_router;
    use crate::screening::conversation::{ASK_FOR_STACK, FAREWELL, GREETING};
    use crate::sessions::SessionStore;
    use crate::storage::test_support::MemoryUploader;
    use crate::storage::{BlobUploader, CandidateStore};

    use super::*;

    struct TestApp {
        router: Router,
        sessions: SessionStore,
        uploader: Arc<MemoryUploader>,
        _dir: tempfile::TempDir,
        data_dir: std::path::PathBuf,
    }

    fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("candidates");
        let uploader = Arc::new(MemoryUploader::default());
        let sessions = SessionStore::default();
        let state = AppState {
            provider: Arc::new(ProviderClient::new(ProviderSettings::default()).unwrap()),
            sessions: sessions.clone(),
            storage: CandidateStore::new(&data_dir, Some(uploader.clone() as Arc<dyn BlobUploader>)),
        };
        TestApp {
            router: build_router(state),
            sessions,
            uploader,
            _dir: dir,
            data_dir,
        }
    }

    async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn new_session(app: &TestApp) -> String {
        let (status, body) = send(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    async fn say(app: &TestApp, id: &str, message: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/messages"),
            Some(json!({ "message": message })),
        )
        .await
    }

    fn saved_files(app: &TestApp) -> usize {
        std::fs::read_dir(&app.data_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_health_reports_offline_provider() {
        let app = test_app();
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "rule_based");
        assert_eq!(body["blob_upload"], true);
    }

    #[tokio::test]
    async fn test_full_screening_flow_persists_redacted_record() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, view) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/candidate"),
            Some(json!({
                "full_name": " Ada Lovelace ",
                "email": "a@b.com",
                "phone": "555-1234",
                "years_experience": 3.5,
                "desired_positions": "Backend Engineer",
                "location": "London",
                "tech_stack": "Python, React"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["messages"][0]["text"], "Candidate registered: Ada Lovelace");
        assert_eq!(view["messages"][1]["text"], GREETING);

        let (status, body) = say(&app, &id, "Please generate my questions").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reply"]
            .as_str()
            .unwrap()
            .starts_with("Here are the generated technical questions:"));
        assert_eq!(body["uploaded"], true);

        let saved_path = body["saved_to"].as_str().unwrap();
        let saved: Value = serde_json::from_slice(&std::fs::read(saved_path).unwrap()).unwrap();
        assert_eq!(saved["email"], REDACTED_EMAIL);
        assert_eq!(saved["phone"], REDACTED_PHONE);
        assert_eq!(saved["full_name"], "Ada Lovelace");

        let (_, view) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(saved["questions"], view["questions"]);
        assert_eq!(view["questions"].as_array().unwrap().len(), 6);
        assert_eq!(app.uploader.objects.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_screening_without_stack_asks_and_saves_nothing() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, body) = say(&app, &id, "start screening").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], ASK_FOR_STACK);
        assert_eq!(body["saved_to"], Value::Null);
        assert_eq!(saved_files(&app), 0);
    }

    #[tokio::test]
    async fn test_follow_up_chat_does_not_resave_old_questions() {
        let app = test_app();
        let id = new_session(&app).await;

        let (_, body) = say(&app, &id, "Python, SQL").await;
        assert!(body["saved_to"].is_string());

        let (_, body) = say(&app, &id, "how long will this take").await;
        assert_eq!(body["saved_to"], Value::Null);
        assert_eq!(saved_files(&app), 1);
    }

    #[tokio::test]
    async fn test_unknown_inline_stack_returns_guidance_without_saving() {
        let app = test_app();
        let id = new_session(&app).await;

        let (_, body) = say(&app, &id, "Cobol, Fortran").await;
        assert!(body["reply"]
            .as_str()
            .unwrap()
            .contains("Please list your tech stack"));
        assert_eq!(body["saved_to"], Value::Null);
        assert_eq!(saved_files(&app), 0);
    }

    #[tokio::test]
    async fn test_exit_keyword_returns_farewell() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, body) = say(&app, &id, "Bye").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], FAREWELL);
        assert_eq!(body["session_complete"], true);

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(app.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, body) = say(&app, &id, "   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], EMPTY_MESSAGE);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = test_app();
        let (status, body) = say(&app, &Uuid::new_v4().to_string(), "hello").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_out_of_range_experience_is_rejected() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{id}/candidate"),
            Some(json!({ "full_name": "X", "years_experience": 75.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_wins_over_invalid_form() {
        let app = test_app();
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/sessions/{}/candidate", Uuid::new_v4()),
            Some(json!({ "full_name": "X", "years_experience": 75.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_dummy_candidate_fills_profile() {
        let app = test_app();
        let id = new_session(&app).await;

        let (status, view) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/candidate/dummy"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!view["candidate"]["full_name"].as_str().unwrap().is_empty());
        assert_eq!(view["candidate"]["tech_stack"].as_array().unwrap().len(), 3);
        assert_eq!(view["messages"][0]["text"], DUMMY_FILLED);
    }
}
