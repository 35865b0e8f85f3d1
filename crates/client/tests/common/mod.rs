//! Shared fixtures for the client integration tests: a scripted in-memory
//! [`JobApi`], a counting [`Navigator`], and an axum stub of the resize
//! backend bound to an ephemeral port.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::time::Instant;

use gophic_client::api::JobApi;
use gophic_client::error::ClientError;
use gophic_client::http::{ApiClient, Navigator, UnauthorizedReset};
use gophic_client::session::SessionStore;
use gophic_core::dimensions::Dimensions;
use gophic_core::job::{JobStatus, ResizeRequest};
use gophic_core::payload::ImagePayload;
use gophic_core::types::JobId;

// ---------------------------------------------------------------------------
// Scripted JobApi
// ---------------------------------------------------------------------------

/// In-memory backend that replays a fixed status sequence.
///
/// Once the sequence is exhausted every further status query returns
/// `fallback`.
pub struct ScriptedApi {
    statuses: Mutex<VecDeque<JobStatus>>,
    fallback: JobStatus,
    results: Vec<String>,
    reject_create: bool,
    fail_status: bool,
    pub status_calls: Mutex<Vec<Instant>>,
    pub created: Mutex<Vec<ResizeRequest>>,
    pub result_calls: AtomicUsize,
    pub fetched: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new(statuses: Vec<JobStatus>, fallback: JobStatus) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            fallback,
            results: vec!["https://x/y.png".to_string()],
            reject_create: false,
            fail_status: false,
            status_calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            result_calls: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Completes on the first status query.
    pub fn completing() -> Self {
        Self::new(vec![], JobStatus::Completed)
    }

    /// Never completes.
    pub fn stuck() -> Self {
        Self::new(vec![], JobStatus::InProgress)
    }

    pub fn with_results(mut self, results: Vec<&str>) -> Self {
        self.results = results.into_iter().map(String::from).collect();
        self
    }

    pub fn rejecting_create(mut self) -> Self {
        self.reject_create = true;
        self
    }

    pub fn failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn status_call_count(&self) -> usize {
        self.status_calls.lock().unwrap().len()
    }

    pub fn status_call_times(&self) -> Vec<Instant> {
        self.status_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobApi for ScriptedApi {
    async fn create_job(&self, request: &ResizeRequest) -> Result<JobId, ClientError> {
        if self.reject_create {
            return Err(ClientError::ServerRejected {
                status: 500,
                message: "Failed to publish job".to_string(),
            });
        }
        self.created.lock().unwrap().push(request.clone());
        Ok(JobId::new("job-1"))
    }

    async fn job_status(&self, _job_id: &JobId) -> Result<JobStatus, ClientError> {
        self.status_calls.lock().unwrap().push(Instant::now());
        if self.fail_status {
            return Err(ClientError::ServerRejected {
                status: 500,
                message: "Job status check failed.".to_string(),
            });
        }
        let next = self.statuses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }

    async fn job_result(&self, _job_id: &JobId) -> Result<Vec<String>, ClientError> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }

    async fn fetch_reference(&self, reference: &str) -> Result<Vec<u8>, ClientError> {
        self.fetched.lock().unwrap().push(reference.to_string());
        Ok(format!("bytes of {reference}").into_bytes())
    }
}

/// A 640x480 image with a trivial payload.
pub fn sample_image() -> gophic_client::card::CardImage {
    gophic_client::card::CardImage {
        file_name: "cat.png".to_string(),
        payload: ImagePayload::from_base64("data:image/png;base64,QUJD"),
        original: Dimensions::new(640, 480),
    }
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CountingNavigator {
    hits: AtomicUsize,
}

impl CountingNavigator {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn go_home(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

/// Build an [`ApiClient`] with the 401 reset hook installed.
pub fn client_with_reset(
    base_url: &str,
    session: Arc<dyn SessionStore>,
    navigator: Arc<CountingNavigator>,
) -> ApiClient {
    ApiClient::with_client(reqwest::Client::new(), base_url, session.clone())
        .with_inspector(Arc::new(UnauthorizedReset::new(session, navigator)))
}

// ---------------------------------------------------------------------------
// Stub backend
// ---------------------------------------------------------------------------

pub const STUB_TOKEN: &str = "good-token";

/// Observations recorded by the stub backend.
pub struct StubState {
    pub base_url: String,
    pub submitted: Mutex<Vec<serde_json::Value>>,
    pub auth_headers: Mutex<Vec<Option<String>>>,
    pub file_hits: AtomicUsize,
}

/// Start the stub backend. Returns its base URL and recorded state.
///
/// Behaviour:
/// - `POST /resize-images` requires `Bearer good-token`, else 401.
/// - `GET /resize-images/status/missing` is 404, `/status/broken` is 500,
///   anything else is `Completed`.
/// - `GET /resize-images/expired` is 401; `/resize-images/empty` has no
///   images; anything else lists two files.
pub async fn spawn_stub() -> Arc<StubState> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = Arc::new(StubState {
        base_url: format!("http://{addr}"),
        submitted: Mutex::new(Vec::new()),
        auth_headers: Mutex::new(Vec::new()),
        file_hits: AtomicUsize::new(0),
    });

    let app = Router::new()
        .route("/auth/google", get(google_url))
        .route("/resize-images", post(create_job))
        .route("/resize-images/status/{job_id}", get(job_status))
        .route("/resize-images/{job_id}", get(job_result))
        .route("/files/{name}", get(file))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    state
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn google_url() -> impl IntoResponse {
    Json(serde_json::json!({ "googleUrl": "https://accounts.google.com/o/oauth2/auth?x=1" }))
}

async fn create_job(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let auth = bearer(&headers);
    state.auth_headers.lock().unwrap().push(auth.clone());
    let expected = format!("Bearer {STUB_TOKEN}");
    if auth.as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Unauthorized" })),
        );
    }
    state.submitted.lock().unwrap().push(body);
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "job_id": "job-42" })),
    )
}

async fn job_status(Path(job_id): Path<String>) -> impl IntoResponse {
    match job_id.as_str() {
        "missing" => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Job not found" })),
        ),
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "db down" })),
        ),
        _ => (
            StatusCode::OK,
            Json(serde_json::json!({ "job_uuid": job_id, "status": "Completed" })),
        ),
    }
}

async fn job_result(
    State(state): State<Arc<StubState>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match job_id.as_str() {
        "expired" => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "token expired" })),
        ),
        "empty" => (StatusCode::OK, Json(serde_json::json!({ "images": [] }))),
        _ => (
            StatusCode::OK,
            Json(serde_json::json!({
                "images": [
                    format!("{}/files/first.png", state.base_url),
                    format!("{}/files/second.png", state.base_url),
                ]
            })),
        ),
    }
}

async fn file(State(state): State<Arc<StubState>>, Path(name): Path<String>) -> impl IntoResponse {
    state.file_hits.fetch_add(1, Ordering::SeqCst);
    format!("png:{name}").into_bytes()
}
