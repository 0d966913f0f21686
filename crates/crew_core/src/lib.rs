//! Crew core: job status tracking, event log, and result normalization.
//!
//! Everything in this crate is synchronous and free of IO. The client crate
//! feeds fetched status snapshots through [`update`] and executes the
//! returned [`Effect`]s.
mod effect;
mod events;
mod job;
mod msg;
pub mod normalize;
mod record;
mod state;
mod status;
mod update;
mod view_model;
mod wire;

pub use effect::Effect;
pub use events::{Event, EventLog};
pub use job::{JobHandle, JobId};
pub use msg::Msg;
pub use normalize::{normalize_result, normalize_text, strip_json_fence};
pub use record::{CanonicalRecord, Interview, UNKNOWN_PLACEHOLDER};
pub use state::{CycleId, TrackerState};
pub use status::{JobStatus, StatusMachine, Transition};
pub use update::update;
pub use view_model::{JobSnapshot, TrackerView};
pub use wire::{StatusResponse, WireEvent};
