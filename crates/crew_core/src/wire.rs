use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::JobId;

/// Body of `GET /api/crew/{job_id}`.
///
/// Decoding is lenient: every field may be missing, and `status` is kept as
/// a raw value so an unexpected token never fails the whole fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub events: Vec<WireEvent>,
}

impl StatusResponse {
    pub fn status_token(&self) -> Option<&str> {
        self.status.as_str()
    }

    /// False only when the body names a different job than `job_id`.
    pub fn concerns(&self, job_id: &JobId) -> bool {
        self.job_id
            .as_deref()
            .is_none_or(|reported| reported == job_id.as_str())
    }
}

/// One backend progress event as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireEvent {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub data: String,
}
