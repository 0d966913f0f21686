use crew_logging::{crew_debug, crew_info, crew_warn};

use crate::{
    normalize_result, CycleId, Effect, JobStatus, Msg, StatusResponse, TrackerState, Transition,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// This is the only place tracker state changes. Effects are ordered: a
/// cancellation always precedes the start of a replacement cycle.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartTracking { job_id } => {
            if state.is_polling_job(&job_id) {
                crew_debug!("Already polling job {}; start ignored", job_id);
                return (state, Vec::new());
            }
            let (previous, cycle) = state.begin(job_id.clone());
            crew_info!("Tracking job {} (cycle {})", job_id, cycle);
            let mut effects = Vec::with_capacity(2);
            if let Some(previous) = previous {
                effects.push(Effect::CancelPolling { cycle: previous });
            }
            effects.push(Effect::StartPolling { cycle, job_id });
            effects
        }
        Msg::StopTracking => match state.end_cycle() {
            Some(cycle) => {
                crew_info!("Stopped polling (cycle {})", cycle);
                vec![Effect::CancelPolling { cycle }]
            }
            None => Vec::new(),
        },
        Msg::StatusFetched { cycle, response } => apply_status(&mut state, cycle, &response),
        Msg::FetchFailed { cycle, reason } => {
            if state.active_cycle() == Some(cycle) {
                let failures = state.record_failure();
                crew_warn!(
                    "Status fetch failed ({} in a row), retrying: {}",
                    failures,
                    reason
                );
            } else {
                crew_debug!("Dropping failure from stale cycle {}: {}", cycle, reason);
            }
            Vec::new()
        }
        Msg::CycleEnded { cycle } => {
            if state.active_cycle() == Some(cycle) {
                state.end_cycle();
                crew_warn!(
                    "Polling cycle {} ended before the job reached a terminal status",
                    cycle
                );
                vec![Effect::CancelPolling { cycle }]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn apply_status(state: &mut TrackerState, cycle: CycleId, response: &StatusResponse) -> Vec<Effect> {
    let Some(job) = state.job_for_cycle(cycle) else {
        crew_debug!("Dropping status from stale cycle {}", cycle);
        return Vec::new();
    };
    if !response.concerns(job.id()) {
        crew_warn!(
            "Status response for job {} does not match tracked job {}; ignored",
            response.job_id.as_deref().unwrap_or_default(),
            job.id()
        );
        return Vec::new();
    }

    let transition = job.apply_response(response);
    let snapshot = job.snapshot();
    let job_id = job.id().clone();
    let terminal = match transition {
        Transition::Entered(JobStatus::Complete) => {
            let records = normalize_result(job.raw_result());
            crew_info!("Job {} complete with {} records", job_id, records.len());
            Some(Effect::DeliverRecords {
                job_id: job_id.clone(),
                records,
            })
        }
        Transition::Entered(JobStatus::Error) => {
            crew_info!("Job {} reported an error", job_id);
            Some(Effect::ReportFailure {
                job_id: job_id.clone(),
                reason: job.failure_reason(),
            })
        }
        Transition::Entered(JobStatus::Started) | Transition::Unchanged => None,
    };
    state.reset_failures();

    let mut effects = vec![Effect::EmitSnapshot(snapshot)];
    if let Some(terminal) = terminal {
        if let Some(cycle) = state.end_cycle() {
            effects.push(Effect::CancelPolling { cycle });
        }
        effects.push(terminal);
    }
    effects
}
