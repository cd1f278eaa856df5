// src/services/submission_service.rs
//
// Submission Service - one compression round trip
//
// CRITICAL RULES:
// - Exactly one request per call, never retried here
// - Progress checkpoints are reported against the caller's submission id
// - Never touches SessionModel; the controller applies the outcome
// - Every failure becomes a SubmissionError; nothing escapes as a panic

use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AcceptedFileSet, Quality, SessionResult};
use crate::error::{AppResult, SubmissionError};
use crate::integrations::compression::{BatchRequest, CompressionTransport, TransportResponse};
use crate::services::progress_reporter::{ProgressCheckpoint, ProgressReporter};

/// Message used when the service rejects a batch without saying why
pub const SERVER_REJECTED_FALLBACK: &str = "Compression failed";

/// 2xx body. Extra fields (`success`, ...) are ignored.
#[derive(Debug, Deserialize)]
struct CompressSuccessBody {
    file_count: u32,
    download_url: Option<String>,
}

/// Non-2xx body
#[derive(Debug, Deserialize)]
struct CompressErrorBody {
    error: Option<String>,
}

pub struct SubmissionService {
    transport: Arc<dyn CompressionTransport>,
    progress: Arc<ProgressReporter>,
}

impl SubmissionService {
    pub fn new(transport: Arc<dyn CompressionTransport>, progress: Arc<ProgressReporter>) -> Self {
        Self {
            transport,
            progress,
        }
    }

    /// Send the whole batch and interpret the answer
    pub async fn submit(
        &self,
        submission_id: Uuid,
        files: &AcceptedFileSet,
        quality: Quality,
    ) -> Result<SessionResult, SubmissionError> {
        let request = BatchRequest {
            files: files.files().to_vec(),
            quality,
        };

        self.progress.report(submission_id, ProgressCheckpoint::Started);

        let response = self.transport.post_batch(&request).await.map_err(|e| {
            log::warn!("Submission {} got no response: {}", submission_id, e);
            SubmissionError::transport(e.to_string())
        })?;

        self.progress
            .report(submission_id, ProgressCheckpoint::ResponseReceived);

        let result = interpret_response(&response, quality)?;

        self.progress.report(submission_id, ProgressCheckpoint::Parsed);

        log::info!(
            "Submission {} compressed {} files",
            submission_id,
            result.file_count
        );
        Ok(result)
    }

    /// Download the archive for a successful result
    pub async fn fetch_archive(&self, result: &SessionResult) -> AppResult<Bytes> {
        self.transport.fetch_archive(&result.download_url).await
    }
}

/// Turn a raw response into a result or a classified failure
pub fn interpret_response(
    response: &TransportResponse,
    quality: Quality,
) -> Result<SessionResult, SubmissionError> {
    if !response.is_success() {
        let message = serde_json::from_slice::<CompressErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.error)
            .filter(|error| !error.trim().is_empty())
            .unwrap_or_else(|| SERVER_REJECTED_FALLBACK.to_string());

        log::warn!("Compression rejected ({}): {}", response.status, message);
        return Err(SubmissionError::server_rejected(message));
    }

    let body: CompressSuccessBody = serde_json::from_slice(&response.body).map_err(|e| {
        SubmissionError::transport(format!("Unreadable compression response: {}", e))
    })?;

    let download_url = body
        .download_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| SubmissionError::transport("Compression response has no download URL"))?;

    Ok(SessionResult {
        file_count: body.file_count,
        download_url,
        quality,
    })
}
