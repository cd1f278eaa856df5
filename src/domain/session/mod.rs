pub mod entity;
pub mod invariants;

pub use entity::{Phase, Quality, SessionModel, SessionResult, GENERIC_FAILURE_MESSAGE};
pub use invariants::validate_session;
