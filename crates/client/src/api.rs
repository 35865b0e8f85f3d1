//! Typed wrappers for the resize backend's HTTP endpoints.
//!
//! [`JobApi`] is the seam the submit / poll / fetch steps depend on;
//! [`ResizeApi`] implements it over an [`ApiClient`].

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

use gophic_core::job::{JobStatus, ResizeRequest};
use gophic_core::types::JobId;

use crate::error::ClientError;
use crate::http::ApiClient;

const MSG_SUBMIT_FAILED: &str = "Job submission failed.";
const MSG_STATUS_FAILED: &str = "Job status check failed.";
const MSG_RESULT_FAILED: &str = "Job download failed.";
const MSG_LOGIN_FAILED: &str = "Login failed";
const MSG_REFERENCE_FAILED: &str = "Result download failed.";

/// Backend operations the job flow needs.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// `POST /resize-images`, returning the new job's identifier.
    async fn create_job(&self, request: &ResizeRequest) -> Result<JobId, ClientError>;

    /// `GET /resize-images/status/{jobId}`. A 404 maps to [`JobStatus::NotFound`].
    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus, ClientError>;

    /// `GET /resize-images/{jobId}`. An absent list comes back empty.
    async fn job_result(&self, job_id: &JobId) -> Result<Vec<String>, ClientError>;

    /// Plain `GET` of a result reference, returning its bytes.
    async fn fetch_reference(&self, reference: &str) -> Result<Vec<u8>, ClientError>;
}

/* --------------------------------------------------------------------------
Wire types
-------------------------------------------------------------------------- */

/// Response of `POST /resize-images`.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
}

/// Response of `GET /resize-images/status/{jobId}`.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub job_uuid: String,
    pub status: String,
}

/// Response of `GET /resize-images/{jobId}`.
#[derive(Debug, Deserialize)]
pub struct ResultResponse {
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// Response of `GET /auth/google`.
#[derive(Debug, Deserialize)]
pub struct GoogleLoginResponse {
    #[serde(rename = "googleUrl")]
    pub google_url: String,
}

/// Error body shape. The backend uses `error`; `message` is checked first.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/* --------------------------------------------------------------------------
ResizeApi
-------------------------------------------------------------------------- */

/// HTTP implementation of [`JobApi`] plus the login handoff endpoint.
pub struct ResizeApi {
    client: ApiClient,
}

impl ResizeApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch the Google OAuth URL the user should open to sign in.
    pub async fn google_login_url(&self) -> Result<String, ClientError> {
        let response = self.client.send(self.client.get_public("/auth/google")).await?;
        let response = ensure_success(response, true, MSG_LOGIN_FAILED).await?;
        let body: GoogleLoginResponse = response.json().await?;
        Ok(body.google_url)
    }
}

#[async_trait]
impl JobApi for ResizeApi {
    async fn create_job(&self, request: &ResizeRequest) -> Result<JobId, ClientError> {
        let prepared = self.client.post("/resize-images");
        let response = self.client.send(prepared.builder.json(request)).await?;
        let response = ensure_success(response, prepared.authorized, MSG_SUBMIT_FAILED).await?;
        let body: SubmitResponse = response.json().await?;

        tracing::info!(
            job_id = %body.job_id,
            algorithm = %request.algorithm,
            target_width = request.target_width,
            target_height = request.target_height,
            "Resize job created",
        );
        Ok(body.job_id)
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatus, ClientError> {
        let prepared = self
            .client
            .get(&format!("/resize-images/status/{job_id}"));
        let response = self.client.send(prepared.builder).await?;

        // The backend answers 404 until the worker has recorded the job.
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(job_id = %job_id, "Status endpoint returned 404");
            return Ok(JobStatus::NotFound);
        }

        let response = ensure_success(response, prepared.authorized, MSG_STATUS_FAILED).await?;
        let body: StatusResponse = response.json().await?;
        Ok(JobStatus::from_wire(&body.status))
    }

    async fn job_result(&self, job_id: &JobId) -> Result<Vec<String>, ClientError> {
        let prepared = self.client.get(&format!("/resize-images/{job_id}"));
        let response = self.client.send(prepared.builder).await?;
        let response = ensure_success(response, prepared.authorized, MSG_RESULT_FAILED).await?;
        let body: ResultResponse = response.json().await?;
        Ok(body.images.unwrap_or_default())
    }

    async fn fetch_reference(&self, reference: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.client.send(self.client.get_absolute(reference)).await?;
        let response = ensure_success(response, true, MSG_REFERENCE_FAILED).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Ensure the response has a success status code.
///
/// On failure the message comes from the body's `message` or `error`
/// field, falling back to `generic`. A rejected request that carried no
/// credential is reported as [`ClientError::AuthMissing`].
async fn ensure_success(
    response: Response,
    authorized: bool,
    generic: &str,
) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if !authorized && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(ClientError::AuthMissing);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::ServerRejected {
        status: status.as_u16(),
        message: extract_message(&text).unwrap_or_else(|| generic.to_string()),
    })
}

fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let usable = |m: &String| !m.trim().is_empty();
    parsed
        .message
        .filter(usable)
        .or_else(|| parsed.error.filter(usable))
}
