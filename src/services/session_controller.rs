// src/services/session_controller.rs
//
// Session Controller - the orchestrating state machine
//
// Idle -> Selected -> Submitting -> {Succeeded, Failed}
// Succeeded / Failed -> Submitting (retry) or -> Idle (restart)
//
// CRITICAL RULES:
// - Every SessionModel mutation goes through here
// - At most one outstanding compression request, tracked apart from the
//   phase so a restart cannot open a second one
// - The session lock is never held across an await, nor while emitting
// - A response for anything but the current submission is discarded
// - restart never aborts the request already in flight

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use crate::application::dto::SessionView;
use crate::config::ClientConfig;
use crate::domain::{AcceptedFileSet, CandidateFile, DomainError, Phase, Quality, SessionModel, SessionResult};
use crate::error::{AppError, AppResult, SubmissionError, ValidationError};
use crate::events::{
    ArchiveDownloaded,
    EventBus,
    FilesSelected,
    QualityChanged,
    SelectionRejected,
    SessionRestarted,
    StaleResponseDiscarded,
    SubmissionFailed,
    SubmissionStarted,
    SubmissionSucceeded,
};
use crate::infrastructure::ArchiveStore;
use crate::integrations::compression::CompressionTransport;
use crate::services::file_set_validator::{validate_candidates, PartialRejection};
use crate::services::notification_channel::NotificationChannel;
use crate::services::progress_reporter::ProgressReporter;
use crate::services::submission_service::SubmissionService;

/// How a submit or retry call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The session is now Succeeded
    Succeeded(SessionResult),
    /// The session is now Failed
    Failed(SubmissionError),
    /// A request was already outstanding; nothing was sent
    AlreadyInFlight,
    /// The session was restarted while waiting; the response was dropped
    Discarded,
}

/// Result of a successful selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOutcome {
    pub accepted: usize,
    pub rejected: usize,
}

/// Claim on the single transport slot; released when dropped
struct InFlight<'a> {
    slot: &'a Mutex<Option<Uuid>>,
    submission_id: Uuid,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *slot == Some(self.submission_id) {
            *slot = None;
        }
    }
}

pub struct SessionController {
    session: Mutex<SessionModel>,
    in_flight: Mutex<Option<Uuid>>,
    submitter: SubmissionService,
    progress: Arc<ProgressReporter>,
    notifications: Arc<NotificationChannel>,
    archive_store: ArchiveStore,
    event_bus: Arc<EventBus>,
    reveal_delay: Duration,
    max_display_name_len: usize,
}

impl SessionController {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn CompressionTransport>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let progress = Arc::new(ProgressReporter::new(Arc::clone(&event_bus)));
        let notifications = Arc::new(NotificationChannel::new(
            Arc::clone(&event_bus),
            config.notification_duration,
        ));

        Self {
            session: Mutex::new(SessionModel::new()),
            in_flight: Mutex::new(None),
            submitter: SubmissionService::new(transport, Arc::clone(&progress)),
            progress,
            notifications,
            archive_store: ArchiveStore::new(config.archive_file_name.clone()),
            event_bus,
            reveal_delay: config.success_reveal_delay,
            max_display_name_len: config.max_display_name_len,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionModel> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<Uuid>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether a compression request is still awaiting its response,
    /// including one abandoned by a restart
    pub fn request_in_flight(&self) -> bool {
        self.lock_in_flight().is_some()
    }

    pub fn notifications(&self) -> &Arc<NotificationChannel> {
        &self.notifications
    }

    pub fn progress(&self) -> &Arc<ProgressReporter> {
        &self.progress
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Replace the batch with the allowed subset of `candidates`.
    ///
    /// When nothing is allowed the session keeps its phase and files, and
    /// the validation message is recorded as the notice.
    pub fn select_files(&self, candidates: Vec<CandidateFile>) -> AppResult<SelectionOutcome> {
        {
            let session = self.lock();
            if !session.phase.accepts_selection() {
                log::warn!("Selection ignored while {}", session.phase);
                return Err(DomainError::InvalidStateTransition(format!(
                    "cannot select files while {}",
                    session.phase
                ))
                .into());
            }
        }

        let selection = match validate_candidates(candidates) {
            Ok(selection) => selection,
            Err(e) => {
                self.reject(e.clone());
                return Err(e.into());
            }
        };

        let accepted = selection.files.len();
        let rejected = selection.partial_rejection.map(|p| p.rejected).unwrap_or(0);
        let total_bytes = selection.files.total_size();

        {
            let mut session = self.lock();
            session.select(selection.files)?;
            if selection.partial_rejection.is_some() {
                session.set_notice(PartialRejection::MESSAGE);
            }
        }

        log::debug!("Selected {} files ({} skipped)", accepted, rejected);
        self.event_bus
            .emit(FilesSelected::new(accepted, rejected, total_bytes));
        if selection.partial_rejection.is_some() {
            self.notifications.info(PartialRejection::MESSAGE);
        }

        Ok(SelectionOutcome { accepted, rejected })
    }

    /// Drag-and-drop entry point; identical to `select_files`
    pub fn drop_files(&self, candidates: Vec<CandidateFile>) -> AppResult<SelectionOutcome> {
        log::debug!("{} files dropped", candidates.len());
        self.select_files(candidates)
    }

    /// Set the quality, clamping into 1-100. Never changes the phase.
    pub fn set_quality(&self, value: i64) -> Quality {
        let quality = Quality::clamped(value);
        self.lock().set_quality(quality);
        self.event_bus.emit(QualityChanged::new(quality.value()));
        quality
    }

    fn reject(&self, error: ValidationError) {
        let message = error.to_string();
        log::warn!("{}", message);
        self.lock().set_notice(message.clone());
        self.event_bus.emit(SelectionRejected::new(message));
    }

    // ========================================================================
    // SUBMISSION
    // ========================================================================

    /// Compress the current batch
    pub async fn submit(&self) -> AppResult<SubmitOutcome> {
        self.run_submission(false).await
    }

    /// Send the same files and quality again, without re-validating
    pub async fn retry(&self) -> AppResult<SubmitOutcome> {
        self.run_submission(true).await
    }

    async fn run_submission(&self, is_retry: bool) -> AppResult<SubmitOutcome> {
        let submission_id = Uuid::new_v4();

        let (files, quality, in_flight): (AcceptedFileSet, Quality, InFlight<'_>) = {
            let mut session = self.lock();
            let mut slot = self.lock_in_flight();

            if session.phase == Phase::Submitting || slot.is_some() {
                log::warn!("Submission already in flight, ignoring");
                return Ok(SubmitOutcome::AlreadyInFlight);
            }
            if session.files.is_empty() {
                drop(slot);
                drop(session);
                self.reject(ValidationError::NoFilesSelected);
                return Err(ValidationError::NoFilesSelected.into());
            }

            session.begin_submission(submission_id)?;
            *slot = Some(submission_id);
            (
                session.files.clone(),
                session.quality,
                InFlight {
                    slot: &self.in_flight,
                    submission_id,
                },
            )
        };

        self.progress.begin(submission_id);
        log::info!(
            "{} {} files at quality {} ({})",
            if is_retry { "Retrying" } else { "Submitting" },
            files.len(),
            quality,
            submission_id
        );
        self.event_bus.emit(SubmissionStarted::new(
            submission_id,
            files.len(),
            quality.value(),
            is_retry,
        ));

        let outcome = self.submitter.submit(submission_id, &files, quality).await;
        drop(in_flight);

        match outcome {
            Ok(result) => {
                if !self.reveal_delay.is_zero() {
                    tokio::time::sleep(self.reveal_delay).await;
                }
                let applied = self.lock().complete(submission_id, result.clone());
                if !applied {
                    return Ok(self.discard(submission_id));
                }

                self.progress.finish(submission_id);
                self.event_bus.emit(SubmissionSucceeded::new(
                    submission_id,
                    result.file_count,
                    result.download_url.clone(),
                ));
                self.notifications
                    .info(format!("Compressed {} images", result.file_count));
                Ok(SubmitOutcome::Succeeded(result))
            }
            Err(error) => {
                let message = {
                    let mut session = self.lock();
                    if !session.fail(submission_id, error.message.clone()) {
                        None
                    } else {
                        session.error_message.clone()
                    }
                };
                let Some(message) = message else {
                    return Ok(self.discard(submission_id));
                };

                self.progress.finish(submission_id);
                log::warn!("Submission {} failed: {}", submission_id, message);
                self.event_bus.emit(SubmissionFailed::new(
                    submission_id,
                    error.kind,
                    message.clone(),
                ));
                Ok(SubmitOutcome::Failed(SubmissionError {
                    kind: error.kind,
                    message,
                }))
            }
        }
    }

    fn discard(&self, submission_id: Uuid) -> SubmitOutcome {
        log::warn!("Discarding stale response for {}", submission_id);
        self.event_bus.emit(StaleResponseDiscarded::new(submission_id));
        SubmitOutcome::Discarded
    }

    // ========================================================================
    // RECOVERY
    // ========================================================================

    /// Back to Idle from any phase. An outstanding request keeps running but
    /// its response will be discarded.
    pub fn restart(&self) {
        let abandoned = {
            let mut session = self.lock();
            let abandoned = session.submission_id;
            session.restart();
            abandoned
        };

        self.progress.reset();
        if let Some(id) = abandoned {
            log::info!("Restarted with submission {} still in flight", id);
        } else {
            log::debug!("Session restarted");
        }
        self.event_bus.emit(SessionRestarted::new(abandoned));
    }

    // ========================================================================
    // DOWNLOAD
    // ========================================================================

    /// Fetch the archive of a successful session into `dest_dir`
    pub async fn download_archive(&self, dest_dir: &Path) -> AppResult<PathBuf> {
        let result = self.lock().result.clone().ok_or_else(|| {
            AppError::Domain(DomainError::InvalidStateTransition(
                "no compressed archive is available".to_string(),
            ))
        })?;

        let archive = self.submitter.fetch_archive(&result).await?;
        let path = self.archive_store.save(dest_dir, &archive).await?;

        self.event_bus
            .emit(ArchiveDownloaded::new(path.clone(), archive.len() as u64));
        self.notifications
            .info(format!("Saved {}", path.display()));
        Ok(path)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn snapshot(&self) -> SessionModel {
        self.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn progress_percentage(&self) -> u8 {
        self.progress.percentage()
    }

    /// Everything the front end needs to render the session
    pub fn view(&self) -> SessionView {
        let session = self.snapshot();
        SessionView::build(
            &session,
            self.progress.percentage(),
            &self.notifications.active(),
            self.max_display_name_len,
        )
    }
}
