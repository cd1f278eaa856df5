// src/services/session_controller_tests.rs
//
// SESSION CONTROLLER TESTS
//
// PURPOSE:
// - Drive the full Idle -> Selected -> Submitting -> Succeeded/Failed cycle
// - Prove at most one request is ever outstanding
// - Prove a response arriving after restart never reaches the session
//
// INVARIANTS TESTED:
// - submit/retry while Submitting sends nothing
// - Validation failures record a notice and leave the phase alone
// - restart returns to the initial model from every phase
// - Retry resends the identical batch
// - Success is only shown after the reveal delay

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::Semaphore;

use crate::config::ClientConfig;
use crate::domain::{validate_session, CandidateFile, Phase, SessionModel};
use crate::error::{AppError, AppResult, SubmissionErrorKind, ValidationError};
use crate::events::EventBus;
use crate::integrations::compression::{
    BatchRequest,
    CompressionTransport,
    MockCompressionTransport,
    TransportResponse,
};
use crate::services::notification_channel::NotificationKind;
use crate::services::session_controller::{SessionController, SubmitOutcome};

const SUCCESS_BODY: &str = r#"{"success":true,"file_count":3,"download_url":"/dl/abc.zip"}"#;

fn config() -> ClientConfig {
    ClientConfig {
        success_reveal_delay: Duration::ZERO,
        ..ClientConfig::default()
    }
}

fn controller(
    transport: Arc<dyn CompressionTransport>,
    config: ClientConfig,
) -> (Arc<EventBus>, SessionController) {
    let bus = Arc::new(EventBus::new());
    let controller = SessionController::new(&config, transport, Arc::clone(&bus));
    (bus, controller)
}

fn images(n: usize) -> Vec<CandidateFile> {
    (0..n)
        .map(|i| {
            CandidateFile::new(
                format!("photo_{}.jpg", i),
                "image/jpeg",
                Bytes::from(vec![i as u8; 2048]),
            )
        })
        .collect()
}

fn text_file() -> CandidateFile {
    CandidateFile::new("notes.txt", "text/plain", Bytes::from_static(b"hello"))
}

/// Transport that holds every request until the test releases it
struct GatedTransport {
    gate: Semaphore,
    requests: Mutex<Vec<BatchRequest>>,
    response: TransportResponse,
}

impl GatedTransport {
    fn new(response: TransportResponse) -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
            requests: Mutex::new(Vec::new()),
            response,
        })
    }

    fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl CompressionTransport for GatedTransport {
    async fn post_batch(&self, request: &BatchRequest) -> AppResult<TransportResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        permit.forget();
        Ok(self.response.clone())
    }

    async fn fetch_archive(&self, _download_url: &str) -> AppResult<Bytes> {
        Ok(Bytes::from_static(b"PK"))
    }
}

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_three_images_compress_end_to_end() {
        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch()
            .withf(|request| {
                request.files.len() == 3
                    && request.quality.value() == 80
                    && request.files[0].name == "photo_0.jpg"
                    && request.files[2].name == "photo_2.jpg"
            })
            .times(1)
            .returning(|_| Ok(TransportResponse::new(200, SUCCESS_BODY)));

        let (bus, controller) = controller(Arc::new(mock), config());

        let selection = controller.select_files(images(3)).unwrap();
        assert_eq!(selection.accepted, 3);
        assert_eq!(controller.phase(), Phase::Selected);

        let outcome = controller.submit().await.unwrap();

        let SubmitOutcome::Succeeded(result) = outcome else {
            panic!("expected success");
        };
        assert_eq!(result.file_count, 3);
        assert_eq!(result.download_url, "/dl/abc.zip");

        let session = controller.snapshot();
        assert_eq!(session.phase, Phase::Succeeded);
        assert!(validate_session(&session).is_ok());

        let view = controller.view();
        let result_view = view.result.unwrap();
        assert_eq!(result_view.final_quality, "80%");
        assert_eq!(result_view.file_count, 3);
        assert_eq!(result_view.download_url, "/dl/abc.zip");
        assert!(view.can_download);

        let types = bus.emitted_types();
        let progress: Vec<&String> = types.iter().filter(|t| *t == "ProgressUpdated").collect();
        assert_eq!(progress.len(), 3);
        assert!(types.contains(&"SubmissionSucceeded".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_fails_and_retry_resends_identical_batch() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&sent);

        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch().times(2).returning(move |request| {
            sink.lock().unwrap().push(request.clone());
            Ok(TransportResponse::new(500, r#"{"error":"disk full"}"#))
        });

        let (_bus, controller) = controller(Arc::new(mock), config());
        controller.select_files(images(2)).unwrap();
        controller.set_quality(55);

        let first = controller.submit().await.unwrap();
        assert!(matches!(
            &first,
            SubmitOutcome::Failed(e) if e.message == "disk full" && e.kind == SubmissionErrorKind::ServerRejected
        ));
        let session = controller.snapshot();
        assert_eq!(session.phase, Phase::Failed);
        assert_eq!(session.error_message.as_deref(), Some("disk full"));
        assert_eq!(controller.view().error_message.as_deref(), Some("disk full"));

        let second = controller.retry().await.unwrap();
        assert_eq!(first, second);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(sent[0].quality.value(), 55);
    }

    #[tokio::test]
    async fn test_network_failure_carries_transport_message() {
        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch()
            .returning(|_| Err(AppError::Network("connection refused".to_string())));

        let (_bus, controller) = controller(Arc::new(mock), config());
        controller.select_files(images(1)).unwrap();

        let outcome = controller.submit().await.unwrap();
        let SubmitOutcome::Failed(error) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(error.kind, SubmissionErrorKind::Transport);
        assert!(controller
            .snapshot()
            .error_message
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn test_success_after_failure_via_retry() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);

        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch().times(2).returning(move |_| {
            let mut calls = counter.lock().unwrap();
            *calls += 1;
            if *calls == 1 {
                Ok(TransportResponse::new(502, "Bad Gateway"))
            } else {
                Ok(TransportResponse::new(200, SUCCESS_BODY))
            }
        });

        let (_bus, controller) = controller(Arc::new(mock), config());
        controller.select_files(images(3)).unwrap();

        let first = controller.submit().await.unwrap();
        assert!(matches!(first, SubmitOutcome::Failed(ref e) if e.message == "Compression failed"));

        let second = controller.retry().await.unwrap();
        assert!(matches!(second, SubmitOutcome::Succeeded(_)));

        let session = controller.snapshot();
        assert_eq!(session.error_message, None);
        assert!(session.result.is_some());
    }

    #[tokio::test]
    async fn test_retry_from_succeeded_resends_batch() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&sent);

        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch().times(2).returning(move |request| {
            sink.lock().unwrap().push(request.clone());
            Ok(TransportResponse::new(200, SUCCESS_BODY))
        });

        let (bus, controller) = controller(Arc::new(mock), config());
        controller.select_files(images(3)).unwrap();
        controller.set_quality(70);

        assert!(matches!(controller.submit().await.unwrap(), SubmitOutcome::Succeeded(_)));
        assert!(controller.view().can_retry);

        let again = controller.retry().await.unwrap();
        let SubmitOutcome::Succeeded(result) = again else {
            panic!("retry from a succeeded session should succeed");
        };
        assert_eq!(result.quality.value(), 70);
        assert_eq!(controller.phase(), Phase::Succeeded);

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(
            bus.emitted_types()
                .iter()
                .filter(|t| *t == "SubmissionSucceeded")
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_download_saves_archive() {
        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch()
            .returning(|_| Ok(TransportResponse::new(200, SUCCESS_BODY)));
        mock.expect_fetch_archive()
            .withf(|url| url == "/dl/abc.zip")
            .times(1)
            .returning(|_| Ok(Bytes::from_static(b"PK\x03\x04zip")));

        let (bus, controller) = controller(Arc::new(mock), config());
        controller.select_files(images(3)).unwrap();
        controller.submit().await.unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let path = controller.download_archive(dir.path()).await.unwrap();

        assert_eq!(path, dir.path().join("compressed_images.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04zip");
        assert!(bus.emitted_types().contains(&"ArchiveDownloaded".to_string()));
    }

    #[tokio::test]
    async fn test_download_without_result_is_rejected() {
        let (_bus, controller) = controller(Arc::new(MockCompressionTransport::new()), config());
        controller.select_files(images(1)).unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let result = controller.download_archive(dir.path()).await;
        assert!(matches!(result, Err(AppError::Domain(_))));
    }
}

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_no_valid_files_keeps_phase_and_files() {
        let (bus, controller) = controller(Arc::new(MockCompressionTransport::new()), config());
        controller.select_files(images(2)).unwrap();

        let result = controller.select_files(vec![text_file()]);

        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::NoValidFiles))
        ));
        let session = controller.snapshot();
        assert_eq!(session.phase, Phase::Selected);
        assert_eq!(session.files.len(), 2);
        assert_eq!(
            session.notice.as_deref(),
            Some("Please select valid image files (JPG, PNG, GIF, BMP)")
        );
        assert!(bus.emitted_types().contains(&"SelectionRejected".to_string()));
    }

    #[tokio::test]
    async fn test_no_valid_files_from_idle_stays_idle() {
        let (_bus, controller) = controller(Arc::new(MockCompressionTransport::new()), config());
        assert!(controller.drop_files(vec![text_file()]).is_err());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_partial_rejection_notifies_and_selects_subset() {
        let (_bus, controller) = controller(Arc::new(MockCompressionTransport::new()), config());

        let mut candidates = images(2);
        candidates.insert(1, text_file());
        let selection = controller.drop_files(candidates).unwrap();

        assert_eq!(selection.accepted, 2);
        assert_eq!(selection.rejected, 1);

        let session = controller.snapshot();
        assert_eq!(session.phase, Phase::Selected);
        assert_eq!(
            session.notice.as_deref(),
            Some("Some files were skipped. Only image files are supported.")
        );

        let notifications = controller.notifications().active();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Info);
    }

    #[tokio::test]
    async fn test_submit_in_idle_asks_for_files() {
        let (_bus, controller) = controller(Arc::new(MockCompressionTransport::new()), config());

        let result = controller.submit().await;

        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::NoFilesSelected))
        ));
        let session = controller.snapshot();
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.notice.as_deref(), Some("Please select files first"));
    }

    #[tokio::test]
    async fn test_quality_is_clamped_and_keeps_phase() {
        let (_bus, controller) = controller(Arc::new(MockCompressionTransport::new()), config());
        controller.select_files(images(1)).unwrap();

        assert_eq!(controller.set_quality(0).value(), 1);
        assert_eq!(controller.set_quality(250).value(), 100);
        assert_eq!(controller.set_quality(42).value(), 42);
        assert_eq!(controller.phase(), Phase::Selected);
        assert_eq!(controller.view().quality, 42);
    }
}

mod concurrency_tests {
    use super::*;

    #[tokio::test]
    async fn test_double_submit_sends_one_request() {
        let transport = GatedTransport::new(TransportResponse::new(200, SUCCESS_BODY));
        let (_bus, controller) = controller(transport.clone(), config());
        controller.select_files(images(3)).unwrap();

        let first = controller.submit();
        let second = async {
            tokio::task::yield_now().await;
            let outcome = controller.submit().await;
            let retried = controller.retry().await;
            transport.release(1);
            (outcome, retried)
        };

        let (first, (second, retried)) = tokio::join!(first, second);

        assert!(matches!(first.unwrap(), SubmitOutcome::Succeeded(_)));
        assert_eq!(second.unwrap(), SubmitOutcome::AlreadyInFlight);
        assert_eq!(retried.unwrap(), SubmitOutcome::AlreadyInFlight);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_selection_rejected_while_submitting() {
        let transport = GatedTransport::new(TransportResponse::new(200, SUCCESS_BODY));
        let (_bus, controller) = controller(transport.clone(), config());
        controller.select_files(images(1)).unwrap();

        let submit = controller.submit();
        let select = async {
            tokio::task::yield_now().await;
            let result = controller.select_files(images(2));
            transport.release(1);
            result
        };

        let (_, select) = tokio::join!(submit, select);

        assert!(matches!(select, Err(AppError::Domain(_))));
        assert_eq!(controller.snapshot().files.len(), 1);
    }

    #[tokio::test]
    async fn test_late_response_after_restart_is_discarded() {
        let transport = GatedTransport::new(TransportResponse::new(200, SUCCESS_BODY));
        let (bus, controller) = controller(transport.clone(), config());
        controller.select_files(images(3)).unwrap();

        let submit = controller.submit();
        let restart = async {
            tokio::task::yield_now().await;
            controller.restart();
            transport.release(1);
        };

        let (outcome, _) = tokio::join!(submit, restart);

        assert_eq!(outcome.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(controller.snapshot(), SessionModel::new());
        assert_eq!(controller.progress_percentage(), 0);
        assert!(bus
            .emitted_types()
            .contains(&"StaleResponseDiscarded".to_string()));
        assert!(!bus.emitted_types().contains(&"SubmissionSucceeded".to_string()));
    }

    #[tokio::test]
    async fn test_submit_after_restart_waits_for_abandoned_request() {
        let transport = GatedTransport::new(TransportResponse::new(200, SUCCESS_BODY));
        let (_bus, controller) = controller(transport.clone(), config());
        controller.select_files(images(3)).unwrap();

        let abandoned = controller.submit();
        let replacement = async {
            tokio::task::yield_now().await;
            controller.restart();
            controller.select_files(images(1)).unwrap();
            controller.set_quality(30);

            let blocked = controller.submit().await;
            assert!(controller.request_in_flight());
            assert_eq!(transport.request_count(), 1);
            transport.release(2);
            blocked
        };

        let (abandoned, blocked) = tokio::join!(abandoned, replacement);

        assert_eq!(abandoned.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(blocked.unwrap(), SubmitOutcome::AlreadyInFlight);
        assert!(!controller.request_in_flight());
        assert_eq!(controller.phase(), Phase::Selected);

        let SubmitOutcome::Succeeded(result) = controller.submit().await.unwrap() else {
            panic!("submission after the abandoned one should succeed");
        };
        assert_eq!(result.quality.value(), 30);

        let session = controller.snapshot();
        assert_eq!(session.phase, Phase::Succeeded);
        assert_eq!(session.files.len(), 1);
        assert_eq!(transport.request_count(), 2);
    }
}

mod restart_tests {
    use super::*;

    fn assert_restart_resets(controller: &SessionController) {
        controller.restart();
        assert_eq!(controller.snapshot(), SessionModel::new());
        assert_eq!(controller.view().phase, Phase::Idle);
    }

    #[tokio::test]
    async fn test_restart_from_idle_and_selected() {
        let (_bus, controller) = controller(Arc::new(MockCompressionTransport::new()), config());
        assert_restart_resets(&controller);

        controller.select_files(images(2)).unwrap();
        controller.set_quality(10);
        assert_restart_resets(&controller);
        assert_eq!(controller.snapshot().quality.value(), 80);
    }

    #[tokio::test]
    async fn test_restart_from_terminal_phases() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch().returning(move |_| {
            let mut calls = counter.lock().unwrap();
            *calls += 1;
            if *calls == 1 {
                Ok(TransportResponse::new(200, SUCCESS_BODY))
            } else {
                Ok(TransportResponse::new(500, r#"{"error":"boom"}"#))
            }
        });
        let (_bus, controller) = controller(Arc::new(mock), config());

        controller.select_files(images(1)).unwrap();
        controller.submit().await.unwrap();
        assert_eq!(controller.phase(), Phase::Succeeded);
        assert_restart_resets(&controller);

        controller.select_files(images(1)).unwrap();
        controller.submit().await.unwrap();
        assert_eq!(controller.phase(), Phase::Failed);
        assert_restart_resets(&controller);
    }

    #[tokio::test]
    async fn test_restart_from_submitting() {
        let transport = GatedTransport::new(TransportResponse::new(500, "{}"));
        let (_bus, controller) = controller(transport.clone(), config());
        controller.select_files(images(1)).unwrap();

        let submit = controller.submit();
        let restart = async {
            tokio::task::yield_now().await;
            assert_eq!(controller.phase(), Phase::Submitting);
            assert_restart_resets(&controller);
            transport.release(1);
        };

        let (outcome, _) = tokio::join!(submit, restart);
        assert_eq!(outcome.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(controller.snapshot(), SessionModel::new());
    }
}

mod reveal_delay_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_success_revealed_after_delay() {
        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch()
            .returning(|_| Ok(TransportResponse::new(200, SUCCESS_BODY)));

        let config = ClientConfig {
            success_reveal_delay: Duration::from_millis(500),
            ..ClientConfig::default()
        };
        let (_bus, controller) = controller(Arc::new(mock), config);
        controller.select_files(images(3)).unwrap();

        let submit = controller.submit();
        let observer = async {
            tokio::time::sleep(Duration::from_millis(499)).await;
            (controller.phase(), controller.progress_percentage())
        };

        let (outcome, (phase_during_delay, progress_during_delay)) =
            tokio::join!(submit, observer);

        assert_eq!(phase_during_delay, Phase::Submitting);
        assert_eq!(progress_during_delay, 100);
        assert!(matches!(outcome.unwrap(), SubmitOutcome::Succeeded(_)));
        assert_eq!(controller.phase(), Phase::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_delay_discards_success() {
        let mut mock = MockCompressionTransport::new();
        mock.expect_post_batch()
            .returning(|_| Ok(TransportResponse::new(200, SUCCESS_BODY)));

        let config = ClientConfig {
            success_reveal_delay: Duration::from_millis(500),
            ..ClientConfig::default()
        };
        let (_bus, controller) = controller(Arc::new(mock), config);
        controller.select_files(images(3)).unwrap();

        let submit = controller.submit();
        let restart = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            controller.restart();
        };

        let (outcome, _) = tokio::join!(submit, restart);
        assert_eq!(outcome.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(controller.phase(), Phase::Idle);
    }
}
