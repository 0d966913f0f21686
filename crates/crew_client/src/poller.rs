//! Fixed-interval job polling.
//!
//! [`JobPoller`] owns the [`TrackerState`] and is the only code that feeds it.
//! Each polling cycle runs as one tokio task that fetches, hands the outcome
//! back over that cycle's own channel, and sleeps. Outcomes are applied when the subscriber
//! drains them through [`JobPoller::recv`] or [`JobPoller::try_recv`], so all
//! state changes happen on the subscriber's side in arrival order.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crew_core::{update, CycleId, Effect, JobId, JobStatus, Msg, TrackerState, TrackerView};
use crew_logging::{crew_debug, crew_error, crew_info};

use crate::{CrewApi, PollSettings, PollerEvent};

struct RunningCycle {
    id: CycleId,
    cancel: CancellationToken,
    outcomes: mpsc::UnboundedReceiver<Msg>,
}

pub struct JobPoller {
    api: Arc<dyn CrewApi>,
    settings: PollSettings,
    runtime: Handle,
    state: TrackerState,
    running: Option<RunningCycle>,
    pending: VecDeque<PollerEvent>,
}

impl JobPoller {
    /// Creates an idle poller whose cycles are spawned on `runtime`.
    pub fn new(api: Arc<dyn CrewApi>, settings: PollSettings, runtime: Handle) -> Self {
        Self {
            api,
            settings,
            runtime,
            state: TrackerState::new(),
            running: None,
            pending: VecDeque::new(),
        }
    }

    /// Starts polling `job_id`.
    ///
    /// A no-op while `job_id` is already being polled. Any other active cycle
    /// is cancelled first, and its undelivered notifications are dropped.
    pub fn start(&mut self, job_id: impl Into<JobId>) {
        let effects = self.apply(Msg::StartTracking {
            job_id: job_id.into(),
        });
        if !effects.is_empty() {
            self.pending.clear();
        }
        self.run_effects(effects);
    }

    /// Stops polling immediately. Safe to call when idle.
    pub fn stop(&mut self) {
        let effects = self.apply(Msg::StopTracking);
        self.pending.clear();
        self.run_effects(effects);
    }

    pub fn is_polling(&self) -> bool {
        self.state.is_polling()
    }

    pub fn view(&self) -> TrackerView {
        self.state.view()
    }

    /// Next notification without waiting.
    pub fn try_recv(&mut self) -> Option<PollerEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let running = self.running.as_mut()?;
            let next = running.outcomes.try_recv();
            let msg = match next {
                Ok(msg) => msg,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => self.close_cycle()?,
            };
            let effects = self.apply(msg);
            self.run_effects(effects);
        }
    }

    /// Waits for the next notification.
    ///
    /// Returns `None` once polling has ended and every notification has been
    /// delivered.
    pub async fn recv(&mut self) -> Option<PollerEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if !self.state.is_polling() {
                return None;
            }
            let running = self.running.as_mut()?;
            let next = running.outcomes.recv().await;
            let msg = match next {
                Some(msg) => msg,
                None => self.close_cycle()?,
            };
            let effects = self.apply(msg);
            self.run_effects(effects);
        }
    }

    /// Forgets a cycle whose task has returned and builds the message that
    /// tells the reducer about it.
    fn close_cycle(&mut self) -> Option<Msg> {
        let running = self.running.take()?;
        crew_debug!("Polling cycle {} closed its channel", running.id);
        Some(Msg::CycleEnded { cycle: running.id })
    }

    fn apply(&mut self, msg: Msg) -> Vec<Effect> {
        let (state, effects) = update(std::mem::take(&mut self.state), msg);
        self.state = state;
        effects
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling { cycle, job_id } => self.spawn_cycle(cycle, job_id),
                Effect::CancelPolling { cycle } => self.cancel_cycle(cycle),
                Effect::EmitSnapshot(snapshot) => {
                    self.pending.push_back(PollerEvent::Snapshot(snapshot));
                }
                Effect::DeliverRecords { job_id, records } => {
                    self.pending
                        .push_back(PollerEvent::Completed { job_id, records });
                }
                Effect::ReportFailure { job_id, reason } => {
                    self.pending.push_back(PollerEvent::Failed { job_id, reason });
                }
            }
        }
    }

    fn spawn_cycle(&mut self, cycle: CycleId, job_id: JobId) {
        if let Some(previous) = self.running.take() {
            previous.cancel.cancel();
        }
        crew_info!("Polling job {} every {:?}", job_id, self.settings.interval);

        let cancel = CancellationToken::new();
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();
        self.runtime.spawn(poll_cycle(
            self.api.clone(),
            job_id,
            cycle,
            self.settings,
            cancel.clone(),
            outcome_tx,
        ));
        self.running = Some(RunningCycle {
            id: cycle,
            cancel,
            outcomes,
        });
    }

    fn cancel_cycle(&mut self, cycle: CycleId) {
        if self.running.as_ref().is_some_and(|running| running.id == cycle) {
            if let Some(running) = self.running.take() {
                running.cancel.cancel();
                crew_debug!("Cancelled polling cycle {}", cycle);
            }
        }
    }
}

impl Drop for JobPoller {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancel.cancel();
        }
    }
}

/// One polling cycle: fetch at once, then every `interval`, until the
/// backend reports a terminal status for `job_id` or the cycle is cancelled.
/// Fetches are never overlapped, and nothing is sent after cancellation.
/// Dropping `outcome_tx` on return tells the poller the cycle is over.
async fn poll_cycle(
    api: Arc<dyn CrewApi>,
    job_id: JobId,
    cycle: CycleId,
    settings: PollSettings,
    cancel: CancellationToken,
    outcome_tx: mpsc::UnboundedSender<Msg>,
) {
    if settings.interval.is_zero() {
        crew_error!("Polling cycle {} for job {} has a zero interval", cycle, job_id);
        return;
    }
    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            outcome = api.fetch_status(&job_id) => outcome,
        };
        if cancel.is_cancelled() {
            break;
        }

        let (msg, terminal) = match outcome {
            Ok(response) => {
                let terminal = response.concerns(&job_id)
                    && JobStatus::from_token(response.status_token()).is_terminal();
                (Msg::StatusFetched { cycle, response }, terminal)
            }
            Err(err) => (
                Msg::FetchFailed {
                    cycle,
                    reason: err.to_string(),
                },
                false,
            ),
        };
        if outcome_tx.send(msg).is_err() || terminal {
            break;
        }
    }

    crew_debug!("Polling cycle {} for job {} finished", cycle, job_id);
}
