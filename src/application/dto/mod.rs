// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are front-end-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)
// - Everything a front end renders comes from SessionView

use serde::{Deserialize, Serialize};

use crate::application::formatting::{format_file_size, format_quality, truncate_file_name};
use crate::domain::{CandidateFile, Phase, SessionModel, SessionResult};
use crate::services::notification_channel::{Notification, NotificationKind};

// ============================================================================
// SESSION DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItemView {
    /// Full name, for tooltips
    pub name: String,
    /// Name shortened for the file grid
    pub display_name: String,
    pub size_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultView {
    pub file_count: u32,
    /// e.g. "80%"
    pub final_quality: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationView {
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub phase: Phase,
    pub files: Vec<FileItemView>,
    pub total_files: usize,
    pub total_size: String,
    pub quality: u8,
    /// Present only while submitting
    pub progress: Option<u8>,
    pub result: Option<ResultView>,
    /// Text for the error area: the failure message, else the latest notice
    pub error_message: Option<String>,
    pub notifications: Vec<NotificationView>,
    /// File preview and controls are shown once something is selected
    pub controls_visible: bool,
    pub can_submit: bool,
    pub can_retry: bool,
    pub can_download: bool,
}

impl SessionView {
    pub fn build(
        session: &SessionModel,
        progress: u8,
        notifications: &[Notification],
        max_name_len: usize,
    ) -> Self {
        let files: Vec<FileItemView> = session
            .files
            .iter()
            .map(|file| FileItemView::build(file, max_name_len))
            .collect();

        Self {
            phase: session.phase,
            total_files: files.len(),
            total_size: format_file_size(session.files.total_size()),
            files,
            quality: session.quality.value(),
            progress: (session.phase == Phase::Submitting).then_some(progress),
            result: session.result.as_ref().map(ResultView::from),
            error_message: session
                .error_message
                .clone()
                .or_else(|| session.notice.clone()),
            notifications: notifications.iter().map(NotificationView::from).collect(),
            controls_visible: session.phase != Phase::Idle,
            can_submit: session.phase == Phase::Selected,
            can_retry: session.phase.is_terminal(),
            can_download: session.phase == Phase::Succeeded,
        }
    }
}

impl FileItemView {
    pub fn build(file: &CandidateFile, max_name_len: usize) -> Self {
        Self {
            name: file.name.clone(),
            display_name: truncate_file_name(&file.name, max_name_len),
            size_label: format_file_size(file.size),
        }
    }
}

// ============================================================================
// CONVERSION IMPLEMENTATIONS
// ============================================================================

impl From<&SessionResult> for ResultView {
    fn from(result: &SessionResult) -> Self {
        Self {
            file_count: result.file_count,
            final_quality: format_quality(result.quality),
            download_url: result.download_url.clone(),
        }
    }
}

impl From<&Notification> for NotificationView {
    fn from(notification: &Notification) -> Self {
        Self {
            message: notification.message.clone(),
            kind: notification.kind,
        }
    }
}
