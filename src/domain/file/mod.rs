pub mod entity;
pub mod invariants;

pub use entity::{is_allowed_mime_type, AcceptedFileSet, CandidateFile, ALLOWED_MIME_TYPES};
pub use invariants::validate_file_set;
