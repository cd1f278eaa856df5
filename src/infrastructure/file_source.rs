// src/infrastructure/file_source.rs
//
// Local File Source
//
// Turns paths picked by the user into CandidateFiles. Plays the role of the
// file picker and of dropping a folder: directories are walked recursively.
//
// RULES:
// - No filtering here; the validator decides what is accepted
// - The MIME type is sniffed from content, then guessed from the extension

use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::CandidateFile;
use crate::error::{AppError, AppResult};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Load every file under `paths`, in the order given.
/// Directory contents are visited in file-name order.
pub async fn load_candidates(paths: &[PathBuf]) -> AppResult<Vec<CandidateFile>> {
    let mut candidates = Vec::new();

    for path in paths {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            AppError::Other(format!("Cannot read {}: {}", path.display(), e))
        })?;

        if metadata.is_dir() {
            for file in walk_directory(path) {
                candidates.push(load_file(&file).await?);
            }
        } else {
            candidates.push(load_file(path).await?);
        }
    }

    log::debug!("Loaded {} candidate files", candidates.len());
    Ok(candidates)
}

fn walk_directory(directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

async fn load_file(path: &Path) -> AppResult<CandidateFile> {
    let content = Bytes::from(tokio::fs::read(path).await?);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = detect_mime_type(path, &content);

    Ok(CandidateFile::new(name, mime_type, content))
}

/// MIME type from magic bytes, or from the extension when unrecognised
pub fn detect_mime_type(path: &Path, content: &[u8]) -> String {
    if let Some(kind) = infer::get(content) {
        return kind.mime_type().to_string();
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let guessed = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => FALLBACK_MIME_TYPE,
    };
    guessed.to_string()
}
