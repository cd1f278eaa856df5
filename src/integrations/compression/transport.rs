// src/integrations/compression/transport.rs
//
// Seam between the submission logic and the wire.
//
// A transport moves bytes and reports the HTTP status. It does not interpret
// response bodies; that is the submission service's job.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{CandidateFile, Quality};
use crate::error::AppResult;

/// One outbound batch: every file of the session, in order, plus the quality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub files: Vec<CandidateFile>,
    pub quality: Quality,
}

/// Raw answer from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompressionTransport: Send + Sync {
    /// Send the batch. `Err` only when no response was obtained at all.
    async fn post_batch(&self, request: &BatchRequest) -> AppResult<TransportResponse>;

    /// Fetch the archive behind a `download_url` returned by `post_batch`
    async fn fetch_archive(&self, download_url: &str) -> AppResult<Bytes>;
}
