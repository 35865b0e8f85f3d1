//! Resize job model: the creation request, the tracked job record, its
//! status, and the completed result.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::algorithm::Algorithm;
use crate::dimensions::Dimensions;
use crate::error::CoreError;
use crate::payload::ImagePayload;
use crate::types::{JobId, Timestamp};

/* --------------------------------------------------------------------------
Status
-------------------------------------------------------------------------- */

/// Status string the backend reports for a finished job.
pub const STATUS_COMPLETED: &str = "Completed";
/// Status string the backend reports while a worker is busy.
pub const STATUS_IN_PROGRESS: &str = "In Progress";
/// Status the client substitutes when the status endpoint answers 404.
pub const STATUS_NOT_FOUND: &str = "NotFound";

/// Lifecycle status of a resize job as observed by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Accepted by the backend, not yet polled.
    Submitted,
    InProgress,
    Completed,
    /// The status endpoint answered 404. Treated as still running.
    NotFound,
    /// Any other status string, kept verbatim. Treated as still running.
    Unknown(String),
}

impl JobStatus {
    /// Map a backend status string onto the client's status set.
    pub fn from_wire(status: &str) -> Self {
        match status {
            STATUS_COMPLETED => Self::Completed,
            STATUS_IN_PROGRESS => Self::InProgress,
            STATUS_NOT_FOUND => Self::NotFound,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submitted => f.write_str("submitted"),
            Self::InProgress => f.write_str("in-progress"),
            Self::Completed => f.write_str("completed"),
            Self::NotFound => f.write_str("not-found"),
            Self::Unknown(s) => write!(f, "unknown ({s})"),
        }
    }
}

/* --------------------------------------------------------------------------
Creation request
-------------------------------------------------------------------------- */

/// Body of `POST /resize-images`.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResizeRequest {
    #[validate(length(min = 1, message = "at least one image is required"))]
    pub images: Vec<String>,
    pub algorithm: Algorithm,
    #[validate(range(min = 1, message = "target width must be greater than 0"))]
    pub target_width: u32,
    #[validate(range(min = 1, message = "target height must be greater than 0"))]
    pub target_height: u32,
}

impl ResizeRequest {
    /// Build and validate a single-image request.
    pub fn single(
        payload: &ImagePayload,
        algorithm: Algorithm,
        target: Dimensions,
    ) -> Result<Self, CoreError> {
        let request = Self {
            images: vec![payload.as_str().to_string()],
            algorithm,
            target_width: target.width,
            target_height: target.height,
        };
        request
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        Ok(request)
    }
}

/* --------------------------------------------------------------------------
Tracked job
-------------------------------------------------------------------------- */

/// A job the client has submitted and is tracking.
#[derive(Debug, Clone)]
pub struct ResizeJob {
    pub id: JobId,
    pub target: Dimensions,
    pub algorithm: Algorithm,
    pub status: JobStatus,
    pub submitted_at: Timestamp,
}

impl ResizeJob {
    pub fn submitted(id: JobId, target: Dimensions, algorithm: Algorithm) -> Self {
        Self {
            id,
            target,
            algorithm,
            status: JobStatus::Submitted,
            submitted_at: chrono::Utc::now(),
        }
    }
}

/* --------------------------------------------------------------------------
Result
-------------------------------------------------------------------------- */

/// Result references of a completed job, in backend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub job_id: JobId,
    pub references: Vec<String>,
}

impl JobResult {
    /// The reference the client materializes. Only the first is used.
    pub fn primary(&self) -> Option<&str> {
        self.references.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_statuses_map() {
        assert_eq!(JobStatus::from_wire("Completed"), JobStatus::Completed);
        assert_eq!(JobStatus::from_wire("In Progress"), JobStatus::InProgress);
        assert_eq!(JobStatus::from_wire("NotFound"), JobStatus::NotFound);
        assert_eq!(
            JobStatus::from_wire("Queued"),
            JobStatus::Unknown("Queued".to_string())
        );
    }

    #[test]
    fn only_completed_is_completed() {
        assert!(JobStatus::Completed.is_completed());
        assert!(!JobStatus::NotFound.is_completed());
        assert!(!JobStatus::Unknown("completed".into()).is_completed());
    }

    #[test]
    fn request_serializes_camel_case() {
        let payload = ImagePayload::from_base64("QUJD");
        let req =
            ResizeRequest::single(&payload, Algorithm::Bicubic, Dimensions::new(800, 600)).unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "images": ["QUJD"],
                "algorithm": "bicubic",
                "targetWidth": 800,
                "targetHeight": 600,
            })
        );
    }

    #[test]
    fn request_rejects_zero_width() {
        let payload = ImagePayload::from_base64("QUJD");
        let err = ResizeRequest::single(&payload, Algorithm::Nearest, Dimensions::new(0, 600))
            .unwrap_err();
        assert!(err.to_string().contains("target width must be greater than 0"));
    }

    #[test]
    fn primary_is_first_reference() {
        let result = JobResult {
            job_id: JobId::new("j"),
            references: vec!["https://x/a.png".into(), "https://x/b.png".into()],
        };
        assert_eq!(result.primary(), Some("https://x/a.png"));
    }
}
