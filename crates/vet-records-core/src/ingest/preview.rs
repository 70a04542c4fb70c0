//! Preview panel data: what to show for the original file and its header.

use super::UploadRequest;
use crate::models::DocumentResponse;

/// What the preview panel can render for a file.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewSurface<'a> {
    Image { mime_type: &'a str, bytes: &'a [u8] },
    Pdf { bytes: &'a [u8] },
    Text(String),
    /// No inline preview (e.g. docx); show the extracted text instead
    Unsupported,
}

/// Pick a preview surface from raw bytes and MIME type.
pub fn render_preview<'a>(bytes: &'a [u8], mime_type: &'a str) -> PreviewSurface<'a> {
    if mime_type.starts_with("image/") {
        PreviewSurface::Image { mime_type, bytes }
    } else if mime_type == "application/pdf" {
        PreviewSurface::Pdf { bytes }
    } else if mime_type == "text/plain" {
        PreviewSurface::Text(String::from_utf8_lossy(bytes).into_owned())
    } else {
        PreviewSurface::Unsupported
    }
}

/// Header line of the preview panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub filename: String,
    /// e.g. "12.5 KB"
    pub size_label: String,
    /// Upper-case type, e.g. "PDF"
    pub type_label: String,
}

impl DocumentSummary {
    /// Prefer the backend's metadata, fall back to the local upload.
    pub fn new(document: Option<&DocumentResponse>, upload: Option<&UploadRequest>) -> Self {
        let filename = document
            .map(|d| d.filename.clone())
            .or_else(|| upload.map(|u| u.filename.clone()))
            .unwrap_or_else(|| "Unknown File".to_string());
        let size = document
            .map(|d| d.file_size)
            .or_else(|| upload.map(UploadRequest::size))
            .unwrap_or(0);
        let file_type = document
            .map(|d| d.file_type.clone())
            .or_else(|| upload.map(|u| u.file_type.extension().to_string()))
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            filename,
            size_label: format_size_kb(size),
            type_label: file_type.to_uppercase(),
        }
    }
}

/// Format a byte count in KB with one decimal.
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
