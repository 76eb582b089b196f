//! File inputs for the image and OCR endpoints.
//!
//! Every accepted input shape is an explicit `FileInput` variant and resolves
//! to the same `ResolvedFile` before it is attached to a multipart form.

use std::path::{Path, PathBuf};

/// Filename used when raw bytes arrive without metadata.
pub const DEFAULT_FILENAME: &str = "image.png";
/// Content type used when neither the caller nor the filename says otherwise.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";
/// Content type for extensions missing from [`MIME_TYPES`].
pub const GENERIC_CONTENT_TYPE: &str = "application/octet-stream";

const MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("pdf", "application/pdf"),
];

/// Content type for a filename, judged by its extension (case-insensitive).
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    ext.and_then(|ext| {
        MIME_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, mime)| *mime)
    })
    .unwrap_or(GENERIC_CONTENT_TYPE)
}

/// In-memory data that declares its own content type.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

/// A file to upload.
#[derive(Debug, Clone, PartialEq)]
pub enum FileInput {
    /// Read from disk; filename and content type come from the path.
    Path(PathBuf),
    /// Raw bytes, sent as `image.png` / `image/png`.
    Bytes(Vec<u8>),
    Blob(Blob),
    /// Bytes with an explicit filename; content type is inferred when absent.
    Named {
        data: Vec<u8>,
        filename: String,
        content_type: Option<String>,
    },
}

/// Canonical form attached to a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl FileInput {
    pub fn named(data: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        FileInput::Named {
            data: data.into(),
            filename: filename.into(),
            content_type: None,
        }
    }

    /// Produce bytes, filename and content type. Filesystem errors are
    /// returned unchanged.
    pub async fn resolve(self) -> std::io::Result<ResolvedFile> {
        match self {
            FileInput::Path(path) => resolve_path(&path).await,
            FileInput::Bytes(data) => Ok(resolve_bytes(data)),
            FileInput::Blob(blob) => Ok(resolve_blob(blob)),
            FileInput::Named {
                data,
                filename,
                content_type,
            } => Ok(resolve_named(data, filename, content_type)),
        }
    }
}

async fn resolve_path(path: &Path) -> std::io::Result<ResolvedFile> {
    let data = tokio::fs::read(path).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let content_type = content_type_for(&filename).to_string();
    Ok(ResolvedFile {
        data,
        filename,
        content_type,
    })
}

fn resolve_bytes(data: Vec<u8>) -> ResolvedFile {
    ResolvedFile {
        data,
        filename: DEFAULT_FILENAME.to_string(),
        content_type: DEFAULT_CONTENT_TYPE.to_string(),
    }
}

fn resolve_blob(blob: Blob) -> ResolvedFile {
    ResolvedFile {
        data: blob.data,
        filename: DEFAULT_FILENAME.to_string(),
        content_type: blob
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
    }
}

fn resolve_named(data: Vec<u8>, filename: String, content_type: Option<String>) -> ResolvedFile {
    let content_type = content_type
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(|| content_type_for(&filename).to_string());
    ResolvedFile {
        data,
        filename,
        content_type,
    }
}

impl From<&str> for FileInput {
    fn from(path: &str) -> Self {
        FileInput::Path(PathBuf::from(path))
    }
}

impl From<String> for FileInput {
    fn from(path: String) -> Self {
        FileInput::Path(PathBuf::from(path))
    }
}

impl From<&Path> for FileInput {
    fn from(path: &Path) -> Self {
        FileInput::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for FileInput {
    fn from(path: PathBuf) -> Self {
        FileInput::Path(path)
    }
}

impl From<Vec<u8>> for FileInput {
    fn from(data: Vec<u8>) -> Self {
        FileInput::Bytes(data)
    }
}

impl From<&[u8]> for FileInput {
    fn from(data: &[u8]) -> Self {
        FileInput::Bytes(data.to_vec())
    }
}

impl From<Blob> for FileInput {
    fn from(blob: Blob) -> Self {
        FileInput::Blob(blob)
    }
}
