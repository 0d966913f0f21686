//! Crew client: backend API access, job polling, and record export.
mod api;
mod export;
mod poller;
mod types;

pub use api::{CrewApi, ReqwestCrewApi};
pub use export::{export_records, AtomicFileWriter, ExportError};
pub use poller::JobPoller;
pub use types::{
    ApiSettings, FailureKind, FetchError, PollSettings, PollerEvent, ResearchRequest,
    DEFAULT_BASE_URL,
};
