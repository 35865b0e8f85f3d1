//! File naming for downloaded results.

use crate::types::JobId;

/// Extract a file name from a result reference by taking the last path
/// segment.
///
/// Strips query parameters and fragments. Falls back to `resized-{job_id}`
/// when the reference has no usable segment.
pub fn result_file_name(reference: &str, job_id: &JobId) -> String {
    let clean = reference.split('?').next().unwrap_or(reference);
    let clean = clean.split('#').next().unwrap_or(clean);

    let path = if let Some(rest) = clean
        .strip_prefix("https://")
        .or_else(|| clean.strip_prefix("http://"))
    {
        rest.find('/').map(|i| &rest[i..]).unwrap_or("")
    } else {
        clean
    };

    path.rsplit('/')
        .find(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("resized-{job_id}"))
}
