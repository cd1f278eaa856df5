// src/lib.rs
// imagepress - batch image compression client
//
// Architecture:
// - Domain-centric: session rules live in the domain (SessionModel, Phase)
// - Event-driven: progress, notifications and results are published as events
// - Explicit: one controller owns every state transition
// - Remote work: compression happens on the server; this crate orchestrates it

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod infrastructure;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Configuration
// ============================================================================

pub use config::ClientConfig;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_file_set,
    validate_session,
    // File
    AcceptedFileSet,
    CandidateFile,
    DomainError,
    // Session
    Phase,
    Quality,
    SessionModel,
    SessionResult,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult, SubmissionError, SubmissionErrorKind, ValidationError};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    ArchiveDownloaded,
    DomainEvent,
    EventBus,
    EventLogEntry,
    FilesSelected,
    NotificationRaised,
    ProgressUpdated,
    QualityChanged,
    SelectionRejected,
    SessionRestarted,
    StaleResponseDiscarded,
    SubmissionFailed,
    SubmissionStarted,
    SubmissionSucceeded,
};

// ============================================================================
// PUBLIC API - Infrastructure
// ============================================================================

pub use infrastructure::{load_candidates, ArchiveStore};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    // File Set Validator
    validate_candidates,
    // Notification Channel
    NotificationChannel,
    NotificationKind,
    PartialRejection,
    // Progress Reporter
    ProgressCheckpoint,
    ProgressReporter,
    SelectionOutcome,
    // Session Controller
    SessionController,
    // Submission Service
    SubmissionService,
    SubmitOutcome,
    ValidatedSelection,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorBoundary, ErrorResponse};

// Re-export application submodules
pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{BatchRequest, CompressionTransport, HttpCompressionClient, TransportResponse};
