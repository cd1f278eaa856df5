use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::file::AcceptedFileSet;
use crate::domain::{DomainError, DomainResult};

/// Message shown when a failure carries no text of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred during compression";

/// Lifecycle state of the current batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Selected,
    Submitting,
    Succeeded,
    Failed,
}

/// Compression quality passed unchanged to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Number of images the service processed
    pub file_count: u32,

    /// Where the archive can be fetched from
    pub download_url: String,

    /// Quality the batch was submitted with
    pub quality: Quality,
}

/// The state of one compression session.
///
/// Created empty at startup, mutated only by the session controller and
/// cleared (never destroyed) on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionModel {
    /// Current batch, in selection order
    pub files: AcceptedFileSet,

    /// Chosen quality
    pub quality: Quality,

    /// Lifecycle phase
    pub phase: Phase,

    /// Present only when phase is Succeeded
    pub result: Option<SessionResult>,

    /// Present only when phase is Failed
    pub error_message: Option<String>,

    /// Latest validation message (does not affect the phase)
    pub notice: Option<String>,

    /// Identifies the outstanding request while Submitting
    pub submission_id: Option<Uuid>,
}

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;
    pub const DEFAULT: Quality = Quality(80);

    /// Strict constructor; rejects anything outside 1-100
    pub fn new(value: i64) -> DomainResult<Self> {
        if value < Self::MIN as i64 || value > Self::MAX as i64 {
            return Err(DomainError::InvalidQuality(value));
        }
        Ok(Self(value as u8))
    }

    /// Lenient constructor used for slider input
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Quality {
    type Error = DomainError;

    fn try_from(value: i64) -> DomainResult<Self> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> u8 {
        quality.0
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Phase {
    /// Phases in which a new selection may replace the batch
    pub fn accepts_selection(self) -> bool {
        !matches!(self, Phase::Submitting)
    }

    /// Phases from which a submission (or retry) may start
    pub fn accepts_submission(self) -> bool {
        matches!(self, Phase::Selected | Phase::Succeeded | Phase::Failed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Selected => write!(f, "selected"),
            Phase::Submitting => write!(f, "submitting"),
            Phase::Succeeded => write!(f, "succeeded"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

impl SessionModel {
    /// Create the initial, empty session
    pub fn new() -> Self {
        Self {
            files: AcceptedFileSet::empty(),
            quality: Quality::default(),
            phase: Phase::Idle,
            result: None,
            error_message: None,
            notice: None,
            submission_id: None,
        }
    }

    /// Replace the batch with a validated selection
    pub fn select(&mut self, files: AcceptedFileSet) -> DomainResult<()> {
        if !self.phase.accepts_selection() {
            return Err(DomainError::InvalidStateTransition(format!(
                "cannot select files while {}",
                self.phase
            )));
        }
        if files.is_empty() {
            return Err(DomainError::InvariantViolation(
                "selection cannot be empty".to_string(),
            ));
        }

        self.files = files;
        self.result = None;
        self.error_message = None;
        self.notice = None;
        self.phase = Phase::Selected;
        Ok(())
    }

    /// Quality may change in any phase; the phase is untouched
    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    /// Back to the initial state, from any phase
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Enter Submitting for the given request id
    pub fn begin_submission(&mut self, submission_id: Uuid) -> DomainResult<()> {
        if !self.phase.accepts_submission() {
            return Err(DomainError::InvalidStateTransition(format!(
                "cannot submit while {}",
                self.phase
            )));
        }
        if self.files.is_empty() {
            return Err(DomainError::InvariantViolation(
                "cannot submit an empty batch".to_string(),
            ));
        }

        self.result = None;
        self.error_message = None;
        self.notice = None;
        self.submission_id = Some(submission_id);
        self.phase = Phase::Submitting;
        Ok(())
    }

    /// Whether `submission_id` is the request this session is waiting on
    pub fn is_current_submission(&self, submission_id: Uuid) -> bool {
        self.phase == Phase::Submitting && self.submission_id == Some(submission_id)
    }

    /// Apply a successful outcome.
    /// Returns false (and changes nothing) when the outcome is stale.
    pub fn complete(&mut self, submission_id: Uuid, result: SessionResult) -> bool {
        if !self.is_current_submission(submission_id) {
            return false;
        }
        self.result = Some(result);
        self.error_message = None;
        self.submission_id = None;
        self.phase = Phase::Succeeded;
        true
    }

    /// Apply a failed outcome.
    /// Returns false (and changes nothing) when the outcome is stale.
    pub fn fail(&mut self, submission_id: Uuid, message: impl Into<String>) -> bool {
        if !self.is_current_submission(submission_id) {
            return false;
        }
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        self.result = None;
        self.error_message = Some(message);
        self.submission_id = None;
        self.phase = Phase::Failed;
        true
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }
}

impl Default for SessionModel {
    fn default() -> Self {
        Self::new()
    }
}
