use super::entity::AcceptedFileSet;
use crate::domain::{DomainError, DomainResult};

/// Validates all AcceptedFileSet invariants
pub fn validate_file_set(set: &AcceptedFileSet) -> DomainResult<()> {
    validate_mime_types(set)?;
    Ok(())
}

/// Every file must carry an allowlisted MIME type
fn validate_mime_types(set: &AcceptedFileSet) -> DomainResult<()> {
    if let Some(file) = set.iter().find(|f| !f.is_image()) {
        return Err(DomainError::InvariantViolation(format!(
            "File {:?} has unsupported type {:?}",
            file.name, file.mime_type
        )));
    }
    Ok(())
}
