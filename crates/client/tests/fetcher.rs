//! Integration tests for result retrieval gated on job completion.

mod common;

use std::sync::atomic::Ordering;

use assert_matches::assert_matches;

use common::ScriptedApi;
use gophic_client::error::ClientError;
use gophic_client::fetcher::ResultFetcher;
use gophic_core::job::JobStatus;
use gophic_core::types::JobId;

#[tokio::test]
async fn in_progress_job_gets_no_result_request() {
    let api = ScriptedApi::stuck();
    let fetcher = ResultFetcher::new(&api);

    let err = fetcher
        .fetch_completed(&JobId::new("job-1"))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ClientError::NotCompleted { ref job_id, status: JobStatus::InProgress }
            if job_id.as_str() == "job-1"
    );
    assert_eq!(api.status_call_count(), 1);
    assert_eq!(api.result_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_job_gets_no_result_request() {
    let api = ScriptedApi::new(vec![], JobStatus::NotFound);
    let fetcher = ResultFetcher::new(&api);

    assert_matches!(
        fetcher.fetch_completed(&JobId::new("ghost")).await,
        Err(ClientError::NotCompleted { status: JobStatus::NotFound, .. })
    );
    assert_eq!(api.result_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn completed_job_result_is_fetched_after_one_status_query() {
    let api = ScriptedApi::completing().with_results(vec!["https://x/a.png", "https://x/b.png"]);
    let fetcher = ResultFetcher::new(&api);

    let result = fetcher.fetch_completed(&JobId::new("job-1")).await.unwrap();

    assert_eq!(result.primary(), Some("https://x/a.png"));
    assert_eq!(api.status_call_count(), 1);
    assert_eq!(api.result_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn status_failure_skips_result_request() {
    let api = ScriptedApi::completing().failing_status();
    let fetcher = ResultFetcher::new(&api);

    assert_matches!(
        fetcher.fetch_completed(&JobId::new("job-1")).await,
        Err(ClientError::ServerRejected { status: 500, .. })
    );
    assert_eq!(api.result_calls.load(Ordering::SeqCst), 0);
}
