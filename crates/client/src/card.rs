//! Per-image job card: the state machine that drives one resize job.
//!
//! ```text
//!   Idle --send--> Processing --poll completes--> Processed --download--> Processed
//!                      |
//!                      +--submit / poll fails--> Idle
//! ```
//!
//! A card owns its image, its target settings, its job and its own
//! cancellation token, so cards never share mutable state with each other.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use gophic_core::algorithm::Algorithm;
use gophic_core::dimensions::{read_dimensions, Dimensions, ResizeMode};
use gophic_core::job::{JobStatus, ResizeJob};
use gophic_core::payload::ImagePayload;
use gophic_core::types::{CardId, JobId};

use crate::api::JobApi;
use crate::error::ClientError;
use crate::fetcher::ResultFetcher;
use crate::poller::{JobPoller, PollConfig};
use crate::submit::JobSubmitter;

/// Where a card is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardState {
    Idle,
    Processing,
    Processed { job_id: JobId },
}

impl CardState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Processed { .. } => "processed",
        }
    }
}

/// The uploaded image a card works on.
#[derive(Debug, Clone)]
pub struct CardImage {
    pub file_name: String,
    pub payload: ImagePayload,
    pub original: Dimensions,
}

impl CardImage {
    /// Encode `bytes` and read the original size from the image header.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Result<Self, ClientError> {
        let original = read_dimensions(bytes)?;
        Ok(Self {
            file_name: file_name.into(),
            payload: ImagePayload::from_bytes(bytes),
            original,
        })
    }
}

pub struct JobCard {
    id: CardId,
    image: CardImage,
    target: Dimensions,
    algorithm: Algorithm,
    state: CardState,
    job: Option<ResizeJob>,
    api: Arc<dyn JobApi>,
    poll: PollConfig,
    cancel: CancellationToken,
}

impl JobCard {
    /// New idle card targeting the image's original size with the default
    /// algorithm.
    pub fn new(api: Arc<dyn JobApi>, poll: PollConfig, image: CardImage) -> Self {
        Self {
            id: CardId::new(),
            target: image.original,
            image,
            algorithm: Algorithm::default(),
            state: CardState::Idle,
            job: None,
            api,
            poll,
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.image.file_name
    }

    pub fn original(&self) -> Dimensions {
        self.image.original
    }

    pub fn target(&self) -> Dimensions {
        self.target
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    /// The tracked job, present once the card has reached `Processed`.
    pub fn job(&self) -> Option<&ResizeJob> {
        self.job.as_ref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Stop any in-flight poll loop or download on this card.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub(crate) fn set_cancellation(&mut self, token: CancellationToken) {
        self.cancel = token;
    }

    /// Change the target size. Only allowed while idle.
    pub fn set_target(&mut self, target: Dimensions) -> Result<(), ClientError> {
        self.ensure_idle()?;
        target.validate()?;
        self.target = target;
        Ok(())
    }

    /// Change the target size from a resize mode against the original size.
    pub fn apply_mode(&mut self, mode: ResizeMode) -> Result<(), ClientError> {
        let target = mode.resolve(self.image.original)?;
        self.set_target(target)
    }

    /// Change the algorithm. Only allowed while idle.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) -> Result<(), ClientError> {
        self.ensure_idle()?;
        self.algorithm = algorithm;
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), ClientError> {
        if self.state != CardState::Idle {
            return Err(ClientError::CardBusy(self.id));
        }
        Ok(())
    }

    /// Submit the job and poll it to completion.
    ///
    /// On success the card is `Processed`; on any failure the error is
    /// logged, the card falls back to `Idle` and the error is returned.
    pub async fn send(&mut self) -> Result<JobId, ClientError> {
        self.ensure_idle()?;
        self.state = CardState::Processing;
        tracing::info!(
            card_id = %self.id,
            file = %self.image.file_name,
            target = %self.target,
            algorithm = %self.algorithm,
            "Sending resize job",
        );

        match self.run_job().await {
            Ok(job) => {
                let job_id = job.id.clone();
                tracing::info!(
                    card_id = %self.id,
                    job_id = %job_id,
                    submitted_at = %job.submitted_at,
                    "Card processed",
                );
                self.state = CardState::Processed {
                    job_id: job_id.clone(),
                };
                self.job = Some(job);
                Ok(job_id)
            }
            Err(e) => {
                tracing::error!(card_id = %self.id, error = %e, "Resize job failed");
                self.state = CardState::Idle;
                Err(e)
            }
        }
    }

    async fn run_job(&self) -> Result<ResizeJob, ClientError> {
        let mut job = JobSubmitter::new(self.api.as_ref())
            .submit(&self.image.payload, self.algorithm, self.target)
            .await?;

        JobPoller::new(self.api.as_ref(), self.poll)
            .wait_for_completion(&job.id, &self.cancel)
            .await?;

        job.status = JobStatus::Completed;
        Ok(job)
    }

    /// Fetch the processed result and save its first reference into
    /// `dest_dir`.
    ///
    /// Failures are logged and returned; the card stays `Processed` so the
    /// download can be retried.
    pub async fn download(&self, dest_dir: &Path) -> Result<PathBuf, ClientError> {
        let CardState::Processed { job_id } = &self.state else {
            return Err(ClientError::NotProcessed(self.id));
        };

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.fetch_and_save(job_id, dest_dir) => result,
        };

        if let Err(e) = &result {
            tracing::error!(card_id = %self.id, job_id = %job_id, error = %e, "Download failed");
        }
        result
    }

    async fn fetch_and_save(&self, job_id: &JobId, dest_dir: &Path) -> Result<PathBuf, ClientError> {
        let fetcher = ResultFetcher::new(self.api.as_ref());
        let result = fetcher.fetch(job_id).await?;
        fetcher.materialize(&result, dest_dir).await
    }
}

impl std::fmt::Debug for JobCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobCard")
            .field("id", &self.id)
            .field("file_name", &self.image.file_name)
            .field("target", &self.target)
            .field("algorithm", &self.algorithm)
            .field("state", &self.state)
            .finish()
    }
}
