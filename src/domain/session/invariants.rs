use super::entity::{Phase, SessionModel};
use crate::domain::file::validate_file_set;
use crate::domain::{DomainError, DomainResult};

/// Validates all SessionModel invariants
pub fn validate_session(session: &SessionModel) -> DomainResult<()> {
    validate_file_set(&session.files)?;
    validate_files_present(session)?;
    validate_outcome_fields(session)?;
    validate_submission_id(session)?;
    Ok(())
}

/// Files must be present beyond Idle, and absent in Idle
fn validate_files_present(session: &SessionModel) -> DomainResult<()> {
    match session.phase {
        Phase::Idle if !session.files.is_empty() => Err(DomainError::InvariantViolation(
            "idle session cannot hold files".to_string(),
        )),
        Phase::Idle => Ok(()),
        _ if session.files.is_empty() => Err(DomainError::InvariantViolation(format!(
            "{} session must hold files",
            session.phase
        ))),
        _ => Ok(()),
    }
}

/// Exactly one of result / error_message in terminal phases, neither otherwise
fn validate_outcome_fields(session: &SessionModel) -> DomainResult<()> {
    let has_result = session.result.is_some();
    let has_error = session.error_message.is_some();

    let ok = match session.phase {
        Phase::Succeeded => has_result && !has_error,
        Phase::Failed => has_error && !has_result,
        Phase::Idle | Phase::Selected | Phase::Submitting => !has_result && !has_error,
    };

    if !ok {
        return Err(DomainError::InvariantViolation(format!(
            "{} session has result={} error={}",
            session.phase, has_result, has_error
        )));
    }

    if let Some(result) = &session.result {
        if result.download_url.is_empty() {
            return Err(DomainError::InvariantViolation(
                "succeeded session needs a download URL".to_string(),
            ));
        }
    }
    Ok(())
}

/// A submission id exists exactly while Submitting
fn validate_submission_id(session: &SessionModel) -> DomainResult<()> {
    let submitting = session.phase == Phase::Submitting;
    if submitting != session.submission_id.is_some() {
        return Err(DomainError::InvariantViolation(format!(
            "{} session has submission id {:?}",
            session.phase, session.submission_id
        )));
    }
    Ok(())
}

/// Critical Session Invariants:
///
/// 1. Every file in the batch has an allowlisted MIME type
/// 2. The batch is non-empty whenever the phase is beyond Idle
/// 3. Succeeded carries a result with a download URL, Failed carries a message
/// 4. At most one request is outstanding (one submission id, only while Submitting)
/// 5. Restart always yields the initial state

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::file::{AcceptedFileSet, CandidateFile};
    use crate::domain::session::{Quality, SessionResult};
    use bytes::Bytes;
    use uuid::Uuid;

    fn one_image() -> AcceptedFileSet {
        AcceptedFileSet::from_accepted(vec![CandidateFile::new(
            "cat.jpg",
            "image/jpeg",
            Bytes::from_static(b"\xff\xd8\xff"),
        )])
    }

    #[test]
    fn test_new_session_is_valid() {
        assert!(validate_session(&SessionModel::new()).is_ok());
    }

    #[test]
    fn test_full_lifecycle_stays_valid() {
        let mut session = SessionModel::new();
        session.select(one_image()).unwrap();
        assert!(validate_session(&session).is_ok());

        let id = Uuid::new_v4();
        session.begin_submission(id).unwrap();
        assert!(validate_session(&session).is_ok());

        assert!(session.complete(
            id,
            SessionResult {
                file_count: 1,
                download_url: "/download/x.zip".to_string(),
                quality: Quality::DEFAULT,
            }
        ));
        assert!(validate_session(&session).is_ok());
        assert_eq!(session.phase, Phase::Succeeded);
    }

    #[test]
    fn test_failed_without_message_is_invalid() {
        let mut session = SessionModel::new();
        session.select(one_image()).unwrap();
        session.phase = Phase::Failed;
        assert!(validate_session(&session).is_err());
    }

    #[test]
    fn test_selected_without_files_is_invalid() {
        let mut session = SessionModel::new();
        session.phase = Phase::Selected;
        assert!(validate_session(&session).is_err());
    }

    #[test]
    fn test_submission_id_outside_submitting_is_invalid() {
        let mut session = SessionModel::new();
        session.select(one_image()).unwrap();
        session.submission_id = Some(Uuid::new_v4());
        assert!(validate_session(&session).is_err());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut session = SessionModel::new();
        session.select(one_image()).unwrap();
        let id = Uuid::new_v4();
        session.begin_submission(id).unwrap();
        session.restart();

        assert!(!session.fail(id, "late"));
        assert_eq!(session, SessionModel::new());
    }

    #[test]
    fn test_select_rejected_while_submitting() {
        let mut session = SessionModel::new();
        session.select(one_image()).unwrap();
        session.begin_submission(Uuid::new_v4()).unwrap();

        let result = session.select(one_image());
        assert!(matches!(result, Err(DomainError::InvalidStateTransition(_))));
        assert_eq!(session.phase, Phase::Submitting);
    }

    #[test]
    fn test_empty_failure_message_gets_generic_text() {
        let mut session = SessionModel::new();
        session.select(one_image()).unwrap();
        let id = Uuid::new_v4();
        session.begin_submission(id).unwrap();
        assert!(session.fail(id, "  "));
        assert_eq!(
            session.error_message.as_deref(),
            Some(crate::domain::session::GENERIC_FAILURE_MESSAGE)
        );
    }

    #[test]
    fn test_quality_bounds() {
        assert!(Quality::new(0).is_err());
        assert!(Quality::new(101).is_err());
        assert_eq!(Quality::new(1).unwrap().value(), 1);
        assert_eq!(Quality::clamped(250).value(), 100);
        assert_eq!(Quality::clamped(-3).value(), 1);
        assert_eq!(Quality::default().value(), 80);
    }

    #[test]
    fn test_quality_deserialization_is_bounded() {
        assert_eq!(serde_json::from_str::<Quality>("55").unwrap().value(), 55);
        assert_eq!(serde_json::to_string(&Quality::DEFAULT).unwrap(), "80");
        assert!(serde_json::from_str::<Quality>("0").is_err());
        assert!(serde_json::from_str::<Quality>("255").is_err());
        assert!(serde_json::from_str::<Quality>("-1").is_err());
    }
}
