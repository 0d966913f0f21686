use crate::{CanonicalRecord, CycleId, JobId, JobSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Arm a new polling cycle for `job_id`.
    StartPolling { cycle: CycleId, job_id: JobId },
    /// Cancel the polling cycle `cycle`, including any in-flight fetch.
    CancelPolling { cycle: CycleId },
    EmitSnapshot(JobSnapshot),
    /// The job completed; emitted once per job.
    DeliverRecords {
        job_id: JobId,
        records: Vec<CanonicalRecord>,
    },
    /// The backend reported `ERROR` for the job.
    ReportFailure { job_id: JobId, reason: String },
}
