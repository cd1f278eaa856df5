// src/events/mod.rs
//
// Internal Event System - Public API
//
// EventHandler is internal to the bus module and is not exported.

pub mod bus;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Presentation
    ArchiveDownloaded,
    // Selection
    FilesSelected,
    NotificationRaised,
    // Submission
    ProgressUpdated,
    QualityChanged,
    SelectionRejected,
    SessionRestarted,
    StaleResponseDiscarded,
    SubmissionFailed,
    SubmissionStarted,
    SubmissionSucceeded,
};

pub use bus::{EventBus, EventLogEntry};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
