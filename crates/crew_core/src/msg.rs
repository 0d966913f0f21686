use crate::{CycleId, JobId, StatusResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Caller asked to track a job; replaces whatever was tracked before.
    StartTracking { job_id: JobId },
    /// Caller stopped tracking.
    StopTracking,
    /// A status fetch issued by polling cycle `cycle` succeeded.
    StatusFetched {
        cycle: CycleId,
        response: StatusResponse,
    },
    /// A status fetch issued by polling cycle `cycle` failed.
    FetchFailed { cycle: CycleId, reason: String },
    /// Polling cycle `cycle` stopped on its own and will send nothing more.
    CycleEnded { cycle: CycleId },
}
