//! HTTP repository and authenticator against an in-process notes API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

use notesync_core::auth::{AuthError, Authenticator, Credentials, HttpAuthenticator};
use notesync_core::notification::NotificationCenter;
use notesync_core::repository::{HttpNoteRepository, NoteRepository, RepositoryError};
use notesync_core::session::SessionStore;
use notesync_core::storage::MemoryStorage;
use notesync_core::{ClientConfig, Note, NoteDraft, NoteId, SyncController, ToggleOutcome};

const VALID_TOKEN: &str = "token-root";

#[derive(Clone, Default)]
struct ApiState {
    notes: Arc<Mutex<Vec<Note>>>,
    next_id: Arc<AtomicUsize>,
    seen_authorization: Arc<Mutex<Vec<Option<String>>>>,
}

impl ApiState {
    fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: Arc::new(Mutex::new(notes)),
            next_id: Arc::new(AtomicUsize::new(10)),
            ..Self::default()
        }
    }

    fn record(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.seen_authorization.lock().unwrap().push(value.clone());
        value
    }

    fn last_authorization(&self) -> Option<String> {
        self.seen_authorization.lock().unwrap().last().cloned().flatten()
    }
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

async fn list_notes(State(state): State<ApiState>, headers: HeaderMap) -> Json<Vec<Note>> {
    state.record(&headers);
    Json(state.notes.lock().unwrap().clone())
}

async fn create_note(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let authorization = state.record(&headers);
    let expected = format!("Bearer {VALID_TOKEN}");
    if authorization.as_deref() != Some(expected.as_str()) {
        return Err(api_error(StatusCode::UNAUTHORIZED, "token missing or invalid"));
    }
    if body.get("id").is_some() {
        return Err(api_error(StatusCode::BAD_REQUEST, "id must not be sent"));
    }
    let draft: NoteDraft = serde_json::from_value(body)
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, "content missing"))?;

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let note = Note {
        id: NoteId::Text(format!("n{id}")),
        content: draft.content,
        important: draft.important,
    };
    state.notes.lock().unwrap().push(note.clone());
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(note): Json<Note>,
) -> Result<Json<Note>, ApiError> {
    state.record(&headers);
    let mut notes = state.notes.lock().unwrap();
    let slot = notes
        .iter_mut()
        .find(|existing| existing.id.to_string() == id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "note not found"))?;
    *slot = note.clone();
    Ok(Json(note))
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Result<Json<serde_json::Value>, ApiError> {
    if body.username == "root" && body.password == "salainen" {
        Ok(Json(json!({
            "token": VALID_TOKEN,
            "username": "root",
            "name": "Superuser"
        })))
    } else {
        Err(api_error(
            StatusCode::UNAUTHORIZED,
            "invalid username or password",
        ))
    }
}

async fn spawn_api(state: ApiState) -> ClientConfig {
    let router = Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/{id}", put(update_note))
        .route("/api/login", post(login))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    ClientConfig::new(format!("http://{addr}/api")).unwrap()
}

fn seed_notes() -> Vec<Note> {
    vec![
        Note {
            id: NoteId::from("n1"),
            content: "HTML is easy".to_string(),
            important: true,
        },
        Note {
            id: NoteId::from("n2"),
            content: "Browser can execute only JavaScript".to_string(),
            important: false,
        },
    ]
}

#[tokio::test]
async fn fetch_all_returns_server_order_without_auth_header() {
    let state = ApiState::with_notes(seed_notes());
    let config = spawn_api(state.clone()).await;
    let repository = HttpNoteRepository::new(&config).unwrap();

    let notes = repository.fetch_all().await.unwrap();

    assert_eq!(notes, seed_notes());
    assert_eq!(state.last_authorization(), None);
}

#[tokio::test]
async fn set_token_attaches_bearer_header_to_later_requests() {
    let state = ApiState::with_notes(seed_notes());
    let config = spawn_api(state.clone()).await;
    let repository = HttpNoteRepository::new(&config).unwrap();

    repository.set_token("abc");
    repository.fetch_all().await.unwrap();
    assert_eq!(state.last_authorization().as_deref(), Some("Bearer abc"));

    repository.clear_token();
    repository.fetch_all().await.unwrap();
    assert_eq!(state.last_authorization(), None);
}

#[tokio::test]
async fn create_posts_draft_and_returns_server_note() {
    let state = ApiState::with_notes(Vec::new());
    let config = spawn_api(state.clone()).await;
    let repository = HttpNoteRepository::new(&config).unwrap();
    repository.set_token(VALID_TOKEN);

    let created = repository
        .create(&NoteDraft::new("GET and POST are important", true))
        .await
        .unwrap();

    assert_eq!(created.id, NoteId::from("n10"));
    assert_eq!(created.content, "GET and POST are important");
    assert!(created.important);
    assert_eq!(state.notes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn create_without_token_is_forwarded_as_api_error() {
    let config = spawn_api(ApiState::with_notes(Vec::new())).await;
    let repository = HttpNoteRepository::new(&config).unwrap();

    let error = repository
        .create(&NoteDraft::new("x", false))
        .await
        .unwrap_err();

    match error {
        RepositoryError::Api { status, message } => {
            assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
            assert_eq!(message, "token missing or invalid (401)");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn update_puts_note_to_its_path() {
    let state = ApiState::with_notes(seed_notes());
    let config = spawn_api(state.clone()).await;
    let repository = HttpNoteRepository::new(&config).unwrap();

    let changed = seed_notes()[1].with_importance_toggled();
    let returned = repository.update(&changed.id, &changed).await.unwrap();

    assert_eq!(returned, changed);
    assert!(state.notes.lock().unwrap()[1].important);
}

#[tokio::test]
async fn update_of_missing_note_reports_not_found() {
    let config = spawn_api(ApiState::with_notes(seed_notes())).await;
    let repository = HttpNoteRepository::new(&config).unwrap();

    let ghost = Note {
        id: NoteId::from("gone"),
        content: "ghost".to_string(),
        important: false,
    };
    let error = repository.update(&ghost.id, &ghost).await.unwrap_err();
    assert!(error.is_not_found());
}

#[tokio::test]
async fn authenticator_exchanges_credentials_for_session() {
    let config = spawn_api(ApiState::default()).await;
    let authenticator = HttpAuthenticator::new(&config).unwrap();

    let session = authenticator
        .login(&Credentials::new("root", "salainen"))
        .await
        .unwrap();
    assert_eq!(session.username, "root");
    assert_eq!(session.name, "Superuser");
    assert_eq!(session.token, VALID_TOKEN);

    let error = authenticator
        .login(&Credentials::new("root", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        AuthError::Rejected { status, .. } if status == reqwest::StatusCode::UNAUTHORIZED
    ));
}

#[tokio::test]
async fn controller_round_trip_over_http() {
    let state = ApiState::with_notes(seed_notes());
    let config = spawn_api(state.clone()).await;
    let storage = MemoryStorage::new();
    let controller = SyncController::new(
        HttpNoteRepository::new(&config).unwrap(),
        HttpAuthenticator::new(&config).unwrap(),
        SessionStore::new(storage.clone()),
        NotificationCenter::new(config.notification_timeout()),
    );

    controller.initialize().await.unwrap();
    assert_eq!(controller.notes().unwrap().len(), 2);

    controller.login("root", "salainen").await.unwrap();
    assert!(SessionStore::new(storage).load().is_some());

    let created = controller
        .add_note(NoteDraft::new("a note from the client", false))
        .await
        .unwrap();
    assert_eq!(
        state.last_authorization().as_deref(),
        Some("Bearer token-root")
    );
    assert_eq!(
        controller.notes().unwrap().as_slice().last(),
        Some(&created)
    );

    let outcome = controller.toggle_importance(&created.id).await.unwrap();
    assert!(matches!(outcome, ToggleOutcome::Updated(ref note) if note.important));

    state
        .notes
        .lock()
        .unwrap()
        .retain(|note| note.id != NoteId::from("n2"));
    let outcome = controller
        .toggle_importance(&NoteId::from("n2"))
        .await
        .unwrap();
    assert!(matches!(outcome, ToggleOutcome::Removed(_)));
    assert_eq!(
        controller.notification().as_deref(),
        Some("Note 'Browser can execute only JavaScript' was already removed from server")
    );
    assert_eq!(controller.notes().unwrap().len(), 2);
}
