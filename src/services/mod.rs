// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod file_set_validator;
pub mod notification_channel;
pub mod progress_reporter;
pub mod session_controller;
pub mod submission_service;

#[cfg(test)]
mod session_controller_tests;

// Re-export all services and their types
pub use file_set_validator::{
    validate_candidates,
    PartialRejection,
    ValidatedSelection,
};

pub use notification_channel::{
    Notification,
    NotificationChannel,
    NotificationKind,
};

pub use progress_reporter::{
    ProgressCheckpoint,
    ProgressReporter,
};

pub use session_controller::{
    SelectionOutcome,
    SessionController,
    SubmitOutcome,
};

pub use submission_service::{
    interpret_response,
    SubmissionService,
    SERVER_REJECTED_FALLBACK,
};
