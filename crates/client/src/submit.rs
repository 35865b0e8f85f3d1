//! Job creation step.

use gophic_core::algorithm::Algorithm;
use gophic_core::dimensions::Dimensions;
use gophic_core::job::{ResizeJob, ResizeRequest};
use gophic_core::payload::ImagePayload;

use crate::api::JobApi;
use crate::error::ClientError;

/// Sends one resize request per call.
pub struct JobSubmitter<'a> {
    api: &'a dyn JobApi,
}

impl<'a> JobSubmitter<'a> {
    pub fn new(api: &'a dyn JobApi) -> Self {
        Self { api }
    }

    /// Submit a single image for resizing to `target` with `algorithm`.
    ///
    /// The payload must decode as base64 and the dimensions must be valid
    /// before any request is made. Dimensions are sent unmodified.
    pub async fn submit(
        &self,
        payload: &ImagePayload,
        algorithm: Algorithm,
        target: Dimensions,
    ) -> Result<ResizeJob, ClientError> {
        payload.decode()?;
        let request = ResizeRequest::single(payload, algorithm, target)?;
        let job_id = self.api.create_job(&request).await?;
        Ok(ResizeJob::submitted(job_id, target, algorithm))
    }
}
