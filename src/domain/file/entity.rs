use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// MIME types the compression service accepts.
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
];

/// Whether a MIME type is in the allowlist (ASCII case-insensitive)
pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    let mime_type = mime_type.trim();
    ALLOWED_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
}

/// A file offered by the user, before validation.
/// The content is opaque to the client and sent unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    /// File name as shown to the user and sent in the multipart part
    pub name: String,

    /// Size in bytes
    pub size: u64,

    /// Declared or sniffed MIME type
    pub mime_type: String,

    /// Raw bytes
    #[serde(skip)]
    pub content: Bytes,
}

impl CandidateFile {
    /// Create a candidate whose size is taken from its content
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            mime_type: mime_type.into(),
            content,
        }
    }

    pub fn is_image(&self) -> bool {
        is_allowed_mime_type(&self.mime_type)
    }
}

/// The validated, ordered batch of the current session.
///
/// Order is selection order and is also the order the files are attached
/// to the outbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedFileSet {
    files: Vec<CandidateFile>,
}

impl AcceptedFileSet {
    /// Empty set, used by a fresh or restarted session
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap already-filtered files.
    /// Callers go through the validator; invariants are checked by `validate_file_set`.
    pub(crate) fn from_accepted(files: Vec<CandidateFile>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[CandidateFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateFile> {
        self.files.iter()
    }
}

impl<'a> IntoIterator for &'a AcceptedFileSet {
    type Item = &'a CandidateFile;
    type IntoIter = std::slice::Iter<'a, CandidateFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
