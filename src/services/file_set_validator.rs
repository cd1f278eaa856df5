// src/services/file_set_validator.rs
//
// File Set Validator
//
// Filters a raw selection down to the allowed image types. Pure: no I/O,
// no session access. The caller decides what to do with the outcome.

use crate::domain::{validate_file_set, AcceptedFileSet, CandidateFile};
use crate::error::ValidationError;

/// Some of the candidates were dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialRejection {
    pub rejected: usize,
}

impl PartialRejection {
    pub const MESSAGE: &'static str = "Some files were skipped. Only image files are supported.";
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSelection {
    pub files: AcceptedFileSet,
    pub partial_rejection: Option<PartialRejection>,
}

/// Keep every candidate whose declared type is an allowed image type,
/// preserving selection order. Accepted files carry their type trimmed and
/// lowercased, which is the form sent to the service.
///
/// Fails with `NoValidFiles` when nothing survives, including when the
/// selection itself was empty.
pub fn validate_candidates(
    candidates: Vec<CandidateFile>,
) -> Result<ValidatedSelection, ValidationError> {
    let total = candidates.len();
    let accepted: Vec<CandidateFile> = candidates
        .into_iter()
        .filter(|f| f.is_image())
        .map(|mut f| {
            f.mime_type = f.mime_type.trim().to_ascii_lowercase();
            f
        })
        .collect();

    if accepted.is_empty() {
        log::debug!("Rejected all {} candidate files", total);
        return Err(ValidationError::NoValidFiles);
    }

    let rejected = total - accepted.len();
    let files = AcceptedFileSet::from_accepted(accepted);

    if let Err(e) = validate_file_set(&files) {
        log::error!("Accepted set failed validation: {}", e);
        return Err(ValidationError::NoValidFiles);
    }

    Ok(ValidatedSelection {
        files,
        partial_rejection: (rejected > 0).then_some(PartialRejection { rejected }),
    })
}
