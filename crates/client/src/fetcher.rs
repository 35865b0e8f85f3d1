//! Result retrieval and local materialization.

use std::path::{Path, PathBuf};

use gophic_core::job::{JobResult, JobStatus};
use gophic_core::naming::result_file_name;
use gophic_core::types::JobId;

use crate::api::JobApi;
use crate::error::ClientError;

pub struct ResultFetcher<'a> {
    api: &'a dyn JobApi,
}

impl<'a> ResultFetcher<'a> {
    pub fn new(api: &'a dyn JobApi) -> Self {
        Self { api }
    }

    /// Fetch the result references of a completed job.
    ///
    /// An empty or absent list is [`ClientError::EmptyResult`].
    pub async fn fetch(&self, job_id: &JobId) -> Result<JobResult, ClientError> {
        let references = self.api.job_result(job_id).await?;
        if references.is_empty() {
            return Err(ClientError::EmptyResult {
                job_id: job_id.clone(),
            });
        }
        tracing::debug!(job_id = %job_id, count = references.len(), "Fetched job result");
        Ok(JobResult {
            job_id: job_id.clone(),
            references,
        })
    }

    /// Query the job's status once and fetch its result only if it is
    /// `Completed`. Anything else is [`ClientError::NotCompleted`] and no
    /// result request is made.
    pub async fn fetch_completed(&self, job_id: &JobId) -> Result<JobResult, ClientError> {
        let status = self.api.job_status(job_id).await?;
        if status != JobStatus::Completed {
            tracing::info!(job_id = %job_id, status = %status, "Job not completed, result not requested");
            return Err(ClientError::NotCompleted {
                job_id: job_id.clone(),
                status,
            });
        }
        self.fetch(job_id).await
    }

    /// Download the first reference of `result` into `dest_dir`.
    ///
    /// Remaining references are never requested. Returns the saved path.
    pub async fn materialize(
        &self,
        result: &JobResult,
        dest_dir: &Path,
    ) -> Result<PathBuf, ClientError> {
        let reference = result.primary().ok_or_else(|| ClientError::EmptyResult {
            job_id: result.job_id.clone(),
        })?;

        let bytes = self.api.fetch_reference(reference).await?;
        let file_name = result_file_name(reference, &result.job_id);
        let path = save_bytes(dest_dir, &file_name, bytes).await?;

        tracing::info!(
            job_id = %result.job_id,
            reference,
            path = %path.display(),
            "Result saved",
        );
        Ok(path)
    }
}

/// Write `bytes` to `dest_dir/file_name` through a `.part` sibling and a
/// rename. The buffer is dropped as soon as the write completes.
async fn save_bytes(dest_dir: &Path, file_name: &str, bytes: Vec<u8>) -> Result<PathBuf, ClientError> {
    tokio::fs::create_dir_all(dest_dir).await?;

    let path = dest_dir.join(file_name);
    let partial = dest_dir.join(format!(".{file_name}.part"));

    let written = tokio::fs::write(&partial, &bytes).await;
    drop(bytes);
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }

    tokio::fs::rename(&partial, &path).await?;
    Ok(path)
}
