// src/config.rs
//
// Client configuration
//
// Defaults are production values; every field can be overridden from the
// environment. No request timeout is configured: the client relies on the
// transport's own behavior.

use std::time::Duration;

use crate::error::{AppError, AppResult};

pub const ENV_SERVER_URL: &str = "IMAGEPRESS_SERVER_URL";
pub const ENV_COMPRESS_PATH: &str = "IMAGEPRESS_COMPRESS_PATH";
pub const ENV_REVEAL_DELAY_MS: &str = "IMAGEPRESS_REVEAL_DELAY_MS";
pub const ENV_NOTIFICATION_MS: &str = "IMAGEPRESS_NOTIFICATION_MS";
pub const ENV_MAX_NAME_LEN: &str = "IMAGEPRESS_MAX_NAME_LEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Root URL of the compression service
    pub base_url: String,
    /// Path of the batch endpoint, joined onto `base_url`
    pub compress_path: String,
    /// Pause between the 100% checkpoint and showing the result
    pub success_reveal_delay: Duration,
    /// How long a notification stays visible
    pub notification_duration: Duration,
    /// File names longer than this are shortened for display
    pub max_display_name_len: usize,
    /// Suggested name of the downloaded archive
    pub archive_file_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            compress_path: "/compress".to_string(),
            success_reveal_delay: Duration::from_millis(500),
            notification_duration: Duration::from_millis(3000),
            max_display_name_len: 20,
            archive_file_name: "compressed_images.zip".to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by whatever is set in the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_SERVER_URL) {
            config.base_url = url.trim().to_string();
        }
        if let Some(path) = lookup(ENV_COMPRESS_PATH) {
            config.compress_path = path.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_REVEAL_DELAY_MS) {
            config.success_reveal_delay = Duration::from_millis(parse_number(ENV_REVEAL_DELAY_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_NOTIFICATION_MS) {
            config.notification_duration = Duration::from_millis(parse_number(ENV_NOTIFICATION_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_MAX_NAME_LEN) {
            config.max_display_name_len = parse_number(ENV_MAX_NAME_LEN, &raw)? as usize;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.base_url.is_empty() {
            return Err(AppError::Config("server URL cannot be empty".to_string()));
        }
        if self.compress_path.is_empty() {
            return Err(AppError::Config("compress path cannot be empty".to_string()));
        }
        // Room for at least one character, "..." and a short extension
        if self.max_display_name_len < 8 {
            return Err(AppError::Config(format!(
                "{} must be at least 8, got {}",
                ENV_MAX_NAME_LEN, self.max_display_name_len
            )));
        }
        Ok(())
    }
}

fn parse_number(key: &str, raw: &str) -> AppResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| AppError::Config(format!("{} must be a whole number ({:?}): {}", key, raw, e)))
}
