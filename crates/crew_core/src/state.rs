use crate::{JobHandle, JobId, TrackerView};

/// Identifies one polling cycle. A new cycle is armed every time tracking
/// starts, so responses from an older cycle can be recognised and dropped.
pub type CycleId = u64;

/// Owned tracking session: at most one job and at most one polling cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerState {
    job: Option<JobHandle>,
    active_cycle: Option<CycleId>,
    last_cycle: CycleId,
    consecutive_failures: u32,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job(&self) -> Option<&JobHandle> {
        self.job.as_ref()
    }

    pub fn active_cycle(&self) -> Option<CycleId> {
        self.active_cycle
    }

    pub fn is_polling(&self) -> bool {
        self.active_cycle.is_some()
    }

    /// True when `job_id` is the tracked job and its cycle is still live.
    pub fn is_polling_job(&self, job_id: &JobId) -> bool {
        self.is_polling() && self.job.as_ref().is_some_and(|job| job.id() == job_id)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn view(&self) -> TrackerView {
        TrackerView {
            job_id: self.job.as_ref().map(|job| job.id().clone()),
            status: self.job.as_ref().map(JobHandle::status),
            polling: self.is_polling(),
            event_count: self.job.as_ref().map_or(0, |job| job.events().len()),
            consecutive_failures: self.consecutive_failures,
        }
    }

    /// Replaces the tracked job and arms a fresh cycle. Returns the cycle
    /// that was live before, if any, followed by the new cycle.
    pub(crate) fn begin(&mut self, job_id: JobId) -> (Option<CycleId>, CycleId) {
        let previous = self.active_cycle.take();
        self.last_cycle += 1;
        self.active_cycle = Some(self.last_cycle);
        self.job = Some(JobHandle::new(job_id));
        self.consecutive_failures = 0;
        (previous, self.last_cycle)
    }

    pub(crate) fn end_cycle(&mut self) -> Option<CycleId> {
        self.active_cycle.take()
    }

    /// The tracked job, but only when `cycle` is the live cycle.
    pub(crate) fn job_for_cycle(&mut self, cycle: CycleId) -> Option<&mut JobHandle> {
        if self.active_cycle != Some(cycle) {
            return None;
        }
        self.job.as_mut()
    }

    pub(crate) fn record_failure(&mut self) -> u32 {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.consecutive_failures
    }

    pub(crate) fn reset_failures(&mut self) {
        self.consecutive_failures = 0;
    }
}
