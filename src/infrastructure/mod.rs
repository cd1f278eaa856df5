// src/infrastructure/mod.rs
//
// Infrastructure Layer
//
// Local file system access that supports the session
// but is not part of the domain itself.
//
// RULES:
// - Infrastructure serves the domain
// - Infrastructure never dictates domain behavior
// - Infrastructure is replaceable

pub mod archive_store;
pub mod file_source;

pub use archive_store::ArchiveStore;
pub use file_source::{detect_mime_type, load_candidates};
