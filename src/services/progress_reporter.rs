// src/services/progress_reporter.rs
//
// Progress Reporter - coarse checkpoints of the single network round trip
//
// These are phase markers, not byte-level transfer progress.
// Updates for anything other than the active submission are dropped, so a
// request abandoned by a restart cannot move the progress bar.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::events::{EventBus, ProgressUpdated};

/// Checkpoints in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressCheckpoint {
    /// Immediately before the request is sent
    Started,
    /// A response arrived, body not yet parsed
    ResponseReceived,
    /// The body parsed into a result
    Parsed,
}

impl ProgressCheckpoint {
    pub fn percentage(self) -> u8 {
        match self {
            ProgressCheckpoint::Started => 10,
            ProgressCheckpoint::ResponseReceived => 90,
            ProgressCheckpoint::Parsed => 100,
        }
    }
}

#[derive(Debug, Default)]
struct ProgressState {
    active: Option<Uuid>,
    reached: Option<ProgressCheckpoint>,
}

pub struct ProgressReporter {
    event_bus: Arc<EventBus>,
    state: Mutex<ProgressState>,
}

impl ProgressReporter {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            event_bus,
            state: Mutex::new(ProgressState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start tracking a submission at 0%
    pub fn begin(&self, submission_id: Uuid) {
        let mut state = self.lock();
        state.active = Some(submission_id);
        state.reached = None;
    }

    /// Record a checkpoint for `submission_id`.
    ///
    /// Returns false when the submission is no longer active or the
    /// checkpoint would move progress backwards.
    pub fn report(&self, submission_id: Uuid, checkpoint: ProgressCheckpoint) -> bool {
        {
            let mut state = self.lock();
            if state.active != Some(submission_id) {
                log::debug!(
                    "Dropping {:?} for inactive submission {}",
                    checkpoint,
                    submission_id
                );
                return false;
            }
            if state.reached.is_some_and(|reached| reached >= checkpoint) {
                return false;
            }
            state.reached = Some(checkpoint);
        }

        log::debug!(
            "Submission {} at {}%",
            submission_id,
            checkpoint.percentage()
        );
        self.event_bus
            .emit(ProgressUpdated::new(submission_id, checkpoint));
        true
    }

    /// Stop tracking `submission_id` if it is still the active one
    pub fn finish(&self, submission_id: Uuid) {
        let mut state = self.lock();
        if state.active == Some(submission_id) {
            *state = ProgressState::default();
        }
    }

    /// Forget any active submission
    pub fn reset(&self) {
        *self.lock() = ProgressState::default();
    }

    /// Current percentage (0 when idle)
    pub fn percentage(&self) -> u8 {
        self.lock().reached.map(|c| c.percentage()).unwrap_or(0)
    }

    pub fn active_submission(&self) -> Option<Uuid> {
        self.lock().active
    }
}
