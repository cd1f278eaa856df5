// events/types.rs
//
// All session events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::SubmissionErrorKind;
use crate::services::notification_channel::NotificationKind;
use crate::services::progress_reporter::ProgressCheckpoint;

/// Trait that all session events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// SELECTION EVENTS
// ============================================================================

/// Emitted when a validated selection replaces the batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesSelected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub accepted: usize,
    pub rejected: usize,
    pub total_bytes: u64,
}

impl FilesSelected {
    pub fn new(accepted: usize, rejected: usize, total_bytes: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            accepted,
            rejected,
            total_bytes,
        }
    }
}

impl DomainEvent for FilesSelected {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "FilesSelected" }
}

/// Emitted when a selection or submission is refused before any request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRejected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub reason: String,
}

impl SelectionRejected {
    pub fn new(reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            reason,
        }
    }
}

impl DomainEvent for SelectionRejected {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SelectionRejected" }
}

/// Emitted when the quality control moves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub quality: u8,
}

impl QualityChanged {
    pub fn new(quality: u8) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            quality,
        }
    }
}

impl DomainEvent for QualityChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "QualityChanged" }
}

// ============================================================================
// SUBMISSION EVENTS
// ============================================================================

/// Emitted when the session enters Submitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionStarted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub submission_id: Uuid,
    pub file_count: usize,
    pub quality: u8,
    pub is_retry: bool,
}

impl SubmissionStarted {
    pub fn new(submission_id: Uuid, file_count: usize, quality: u8, is_retry: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            submission_id,
            file_count,
            quality,
            is_retry,
        }
    }
}

impl DomainEvent for SubmissionStarted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SubmissionStarted" }
}

/// Emitted at each progress checkpoint of the current submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub submission_id: Uuid,
    pub checkpoint: ProgressCheckpoint,
    pub percentage: u8,
}

impl ProgressUpdated {
    pub fn new(submission_id: Uuid, checkpoint: ProgressCheckpoint) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            submission_id,
            checkpoint,
            percentage: checkpoint.percentage(),
        }
    }
}

impl DomainEvent for ProgressUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ProgressUpdated" }
}

/// Emitted when the session reaches Succeeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSucceeded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub submission_id: Uuid,
    pub file_count: u32,
    pub download_url: String,
}

impl SubmissionSucceeded {
    pub fn new(submission_id: Uuid, file_count: u32, download_url: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            submission_id,
            file_count,
            download_url,
        }
    }
}

impl DomainEvent for SubmissionSucceeded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SubmissionSucceeded" }
}

/// Emitted when the session reaches Failed
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub submission_id: Uuid,
    pub kind: SubmissionErrorKind,
    pub message: String,
}

impl SubmissionFailed {
    pub fn new(submission_id: Uuid, kind: SubmissionErrorKind, message: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            submission_id,
            kind,
            message,
        }
    }
}

impl DomainEvent for SubmissionFailed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SubmissionFailed" }
}

/// Emitted when a response resolves for a submission the session no longer waits on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleResponseDiscarded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub submission_id: Uuid,
}

impl StaleResponseDiscarded {
    pub fn new(submission_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            submission_id,
        }
    }
}

impl DomainEvent for StaleResponseDiscarded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "StaleResponseDiscarded" }
}

// ============================================================================
// SESSION / PRESENTATION EVENTS
// ============================================================================

/// Emitted when the session is cleared back to Idle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRestarted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Submission that was still in flight, if any
    pub abandoned_submission: Option<Uuid>,
}

impl SessionRestarted {
    pub fn new(abandoned_submission: Option<Uuid>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            abandoned_submission,
        }
    }
}

impl DomainEvent for SessionRestarted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "SessionRestarted" }
}

/// Emitted for every transient user notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRaised {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub message: String,
    pub kind: NotificationKind,
}

impl NotificationRaised {
    pub fn new(message: String, kind: NotificationKind) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            message,
            kind,
        }
    }
}

impl DomainEvent for NotificationRaised {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "NotificationRaised" }
}

/// Emitted when the result archive has been saved locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveDownloaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub path: PathBuf,
    pub bytes: u64,
}

impl ArchiveDownloaded {
    pub fn new(path: PathBuf, bytes: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            path,
            bytes,
        }
    }
}

impl DomainEvent for ArchiveDownloaded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ArchiveDownloaded" }
}
