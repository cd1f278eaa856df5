// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod file;
pub mod session;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// File Domain
pub use file::{
    is_allowed_mime_type, validate_file_set, AcceptedFileSet, CandidateFile, ALLOWED_MIME_TYPES,
};

// Session Domain
pub use session::{validate_session, Phase, Quality, SessionModel, SessionResult};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Quality {0} is outside 1-100")]
    InvalidQuality(i64),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
