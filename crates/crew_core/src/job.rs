use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EventLog, JobSnapshot, JobStatus, StatusMachine, StatusResponse, Transition};

const DEFAULT_FAILURE_REASON: &str = "job failed";

/// Opaque identifier the backend assigns to a research job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Tracked state of one job. Only status responses mutate it, and nothing
/// does once the status is terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct JobHandle {
    id: JobId,
    status: StatusMachine,
    raw_result: Value,
    events: EventLog,
}

impl JobHandle {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            status: StatusMachine::new(),
            raw_result: Value::Null,
            events: EventLog::new(),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn status(&self) -> JobStatus {
        self.status.current()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn raw_result(&self) -> &Value {
        &self.raw_result
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub(crate) fn apply_response(&mut self, response: &StatusResponse) -> Transition {
        if self.is_terminal() {
            return Transition::Unchanged;
        }
        self.events.sync_from(&response.events);
        self.raw_result = response.result.clone();
        self.status.apply(response.status_token())
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            job_id: self.id.clone(),
            status: self.status(),
            events: self.events.entries().to_vec(),
            raw_result: self.raw_result.clone(),
        }
    }

    /// Best available explanation for an `ERROR` status: the backend's
    /// result text, else the last event, else a generic message.
    pub fn failure_reason(&self) -> String {
        self.raw_result
            .as_str()
            .filter(|text| !text.trim().is_empty())
            .or_else(|| self.events.last().map(|event| event.message()))
            .unwrap_or(DEFAULT_FAILURE_REASON)
            .to_string()
    }
}
