use serde_json::Value;

use crate::{Event, JobId, JobStatus};

/// What a subscriber sees after each successful status fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub status: JobStatus,
    pub events: Vec<Event>,
    pub raw_result: Value,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerView {
    pub job_id: Option<JobId>,
    pub status: Option<JobStatus>,
    pub polling: bool,
    pub event_count: usize,
    pub consecutive_failures: u32,
}
