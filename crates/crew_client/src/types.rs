use std::fmt;
use std::time::Duration;

use crew_core::{CanonicalRecord, JobId, JobSnapshot};
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Fixed delay between status fetches; failures do not stretch it.
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
        }
    }
}

/// Body of `POST /api/crew`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchRequest {
    companies: Vec<String>,
    positions: Vec<String>,
}

impl ResearchRequest {
    /// Trims entries and drops blank ones; both lists must keep at least one
    /// entry.
    pub fn new<C, P>(companies: C, positions: P) -> Result<Self, FetchError>
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let companies = clean_entries(companies);
        let positions = clean_entries(positions);
        if companies.is_empty() || positions.is_empty() {
            return Err(FetchError::new(
                FailureKind::InvalidRequest,
                "at least one company and one position are required",
            ));
        }
        Ok(Self {
            companies,
            positions,
        })
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn positions(&self) -> &[String] {
        &self.positions
    }

    /// Number of company/position combinations the backend will research.
    pub fn expected_records(&self) -> usize {
        self.companies.len() * self.positions.len()
    }
}

fn clean_entries<I>(entries: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| entry.as_ref().trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Notification delivered to the poller's subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum PollerEvent {
    Snapshot(JobSnapshot),
    Completed {
        job_id: JobId,
        records: Vec<CanonicalRecord>,
    },
    Failed {
        job_id: JobId,
        reason: String,
    },
}

impl PollerEvent {
    pub fn job_id(&self) -> &JobId {
        match self {
            PollerEvent::Snapshot(snapshot) => &snapshot.job_id,
            PollerEvent::Completed { job_id, .. } | PollerEvent::Failed { job_id, .. } => job_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
