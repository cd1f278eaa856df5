// src/integrations/compression/client.rs
//
// HTTP client for the compression service
//
// ARCHITECTURE:
// - Multipart POST of the whole batch to `{base}/compress`
// - GET of the archive URL returned by the service
// - Maps transport failures to AppError::Network (NO body interpretation)
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never retries; one call, one request
// - No client-side timeout

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Url};

use super::transport::{BatchRequest, CompressionTransport, TransportResponse};
use crate::config::ClientConfig;
use crate::error::{AppError, AppResult};

/// Form field carrying each image
pub const FILES_FIELD: &str = "files";
/// Form field carrying the quality as a decimal string
pub const QUALITY_FIELD: &str = "quality";

pub struct HttpCompressionClient {
    base_url: Url,
    compress_url: Url,
    http_client: Client,
}

impl HttpCompressionClient {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::Config(format!("invalid server URL {:?}: {}", config.base_url, e)))?;
        let compress_url = base_url
            .join(&config.compress_path)
            .map_err(|e| AppError::Config(format!("invalid compress path {:?}: {}", config.compress_path, e)))?;

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            compress_url,
            http_client,
        })
    }

    pub fn compress_url(&self) -> &Url {
        &self.compress_url
    }

    /// Resolve a service-provided download URL (usually a path) against the base
    pub fn resolve_download_url(&self, download_url: &str) -> AppResult<Url> {
        self.base_url
            .join(download_url)
            .map_err(|e| AppError::Network(format!("invalid download URL {:?}: {}", download_url, e)))
    }

    fn build_form(request: &BatchRequest) -> AppResult<Form> {
        let mut form = Form::new();

        for file in &request.files {
            let part = Part::stream_with_length(Body::from(file.content.clone()), file.size)
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|e| {
                    AppError::Other(format!("Invalid MIME type {:?} for {}: {}", file.mime_type, file.name, e))
                })?;
            form = form.part(FILES_FIELD, part);
        }

        Ok(form.text(QUALITY_FIELD, request.quality.value().to_string()))
    }
}

#[async_trait]
impl CompressionTransport for HttpCompressionClient {
    async fn post_batch(&self, request: &BatchRequest) -> AppResult<TransportResponse> {
        let form = Self::build_form(request)?;

        log::info!(
            "Posting {} files at quality {} to {}",
            request.files.len(),
            request.quality,
            self.compress_url
        );

        let response = self
            .http_client
            .post(self.compress_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Compression request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read compression response: {}", e)))?;

        log::debug!("Compression service answered {} ({} bytes)", status, body.len());
        Ok(TransportResponse { status, body })
    }

    async fn fetch_archive(&self, download_url: &str) -> AppResult<Bytes> {
        let url = self.resolve_download_url(download_url)?;
        log::info!("Downloading archive from {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Archive download failed: {}", e)))?
            .error_for_status()?;

        Ok(response.bytes().await?)
    }
}
