// src/application/commands/session_commands.rs
//
// Thin adapters between a front end and the session controller.
// Errors are converted to ErrorResponse; no business logic lives here.

use std::path::{Path, PathBuf};

use crate::application::dto::SessionView;
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::infrastructure::load_candidates;
use crate::services::{SelectionOutcome, SubmitOutcome};

/// Load `paths` from disk and select them
pub async fn select_paths(
    state: &AppState,
    paths: &[PathBuf],
) -> Result<SelectionOutcome, ErrorResponse> {
    let candidates = load_candidates(paths).await?;
    Ok(state.session_controller.select_files(candidates)?)
}

/// Same as `select_paths`, for a drop onto the upload area
pub async fn drop_paths(
    state: &AppState,
    paths: &[PathBuf],
) -> Result<SelectionOutcome, ErrorResponse> {
    let candidates = load_candidates(paths).await?;
    Ok(state.session_controller.drop_files(candidates)?)
}

pub fn set_quality(state: &AppState, quality: i64) -> u8 {
    state.session_controller.set_quality(quality).value()
}

pub async fn compress(state: &AppState) -> Result<SubmitOutcome, ErrorResponse> {
    Ok(state.session_controller.submit().await?)
}

pub async fn retry_compression(state: &AppState) -> Result<SubmitOutcome, ErrorResponse> {
    Ok(state.session_controller.retry().await?)
}

pub fn restart_session(state: &AppState) -> SessionView {
    state.session_controller.restart();
    state.session_controller.view()
}

pub async fn download_archive(state: &AppState, dest_dir: &Path) -> Result<PathBuf, ErrorResponse> {
    Ok(state.session_controller.download_archive(dest_dir).await?)
}

pub fn get_session_view(state: &AppState) -> SessionView {
    state.session_controller.view()
}
