use std::fmt;

use crew_logging::crew_trace;
use serde::{Deserialize, Serialize};

/// Status token the backend reports while a job is still running.
pub const STARTED_MARKER: &str = "STARTED";
/// Status token for a successfully finished job.
pub const COMPLETE_MARKER: &str = "COMPLETE";
/// Status token for a failed job.
pub const ERROR_MARKER: &str = "ERROR";

/// Lifecycle state of a research job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Started,
    Complete,
    Error,
}

impl JobStatus {
    /// Maps a backend status token onto a state.
    ///
    /// Anything other than the two terminal markers, including a missing
    /// token, means the job is still pending.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(COMPLETE_MARKER) => JobStatus::Complete,
            Some(ERROR_MARKER) => JobStatus::Error,
            _ => JobStatus::Started,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Started => STARTED_MARKER,
            JobStatus::Complete => COMPLETE_MARKER,
            JobStatus::Error => ERROR_MARKER,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of feeding one status token into a [`StatusMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Entered(JobStatus),
}

/// Monotonic job status: starts in `Started`, and once `Complete` or
/// `Error` is reached no token can move it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusMachine {
    current: JobStatus,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> JobStatus {
        self.current
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    pub fn apply(&mut self, token: Option<&str>) -> Transition {
        if self.current.is_terminal() {
            crew_trace!(
                "Ignoring status token {:?}; already terminal at {}",
                token,
                self.current
            );
            return Transition::Unchanged;
        }

        let next = JobStatus::from_token(token);
        if next == self.current {
            return Transition::Unchanged;
        }
        self.current = next;
        Transition::Entered(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tokens_stay_pending() {
        let mut machine = StatusMachine::new();
        for token in [None, Some("RUNNING"), Some("complete"), Some(""), Some(STARTED_MARKER)] {
            assert_eq!(machine.apply(token), Transition::Unchanged);
            assert_eq!(machine.current(), JobStatus::Started);
        }
    }

    #[test]
    fn terminal_states_have_no_exit() {
        let mut machine = StatusMachine::new();
        assert_eq!(
            machine.apply(Some(ERROR_MARKER)),
            Transition::Entered(JobStatus::Error)
        );
        for token in [Some(COMPLETE_MARKER), Some(STARTED_MARKER), None] {
            assert_eq!(machine.apply(token), Transition::Unchanged);
        }
        assert_eq!(machine.current(), JobStatus::Error);
    }
}
