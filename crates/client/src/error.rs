use gophic_core::error::CoreError;
use gophic_core::job::JobStatus;
use gophic_core::types::{CardId, JobId};

/// Errors from the resize client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request went out without a credential and the server refused it.
    #[error("Not logged in: no credential stored")]
    AuthMissing,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, body).
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Server rejected request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// A result was requested for a job that has not reached `Completed`.
    #[error("Job {job_id} is not completed yet (status: {status})")]
    NotCompleted { job_id: JobId, status: JobStatus },

    /// A completed job returned no result references.
    #[error("Job {job_id} completed without any result")]
    EmptyResult { job_id: JobId },

    /// The poll loop ran past its budget without seeing completion.
    #[error("Job {job_id} did not complete within {elapsed_ms} ms")]
    Timeout { job_id: JobId, elapsed_ms: u64 },

    #[error("Cancelled")]
    Cancelled,

    /// `send` was triggered on a card that is not idle.
    #[error("Card {0} is not idle")]
    CardBusy(CardId),

    /// `download` was triggered on a card with no completed job.
    #[error("Card {0} has no processed job")]
    NotProcessed(CardId),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}
