//! Ingestion interface: upload validation and the extraction backend seam.
//!
//! The backend itself (OCR, text extraction, record extraction) lives
//! behind [`Ingestor`]; this crate only validates uploads and consumes the
//! [`DocumentResponse`] it returns.

mod preview;

pub use preview::*;

use thiserror::Error;

use crate::config::CoreConfig;
use crate::models::DocumentResponse;

/// Ingestion errors.
#[derive(Error, Debug, PartialEq)]
pub enum IngestError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File is empty. Please upload a file with content")]
    EmptyFile,

    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Extraction failed: {0}")]
    Extraction(String),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Accepted upload file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Jpg,
    Jpeg,
    Png,
    Docx,
    Txt,
}

impl FileType {
    pub const ALL: [FileType; 6] = [
        FileType::Pdf,
        FileType::Jpg,
        FileType::Jpeg,
        FileType::Png,
        FileType::Docx,
        FileType::Txt,
    ];

    /// Parse a bare extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "jpg" => Some(FileType::Jpg),
            "jpeg" => Some(FileType::Jpeg),
            "png" => Some(FileType::Png),
            "docx" => Some(FileType::Docx),
            "txt" => Some(FileType::Txt),
            _ => None,
        }
    }

    /// File type from the text after the last dot of a filename.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Jpg => "jpg",
            FileType::Jpeg => "jpeg",
            FileType::Png => "png",
            FileType::Docx => "docx",
            FileType::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Jpg | FileType::Jpeg => "image/jpeg",
            FileType::Png => "image/png",
            FileType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            FileType::Txt => "text/plain",
        }
    }
}

/// A validated upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub filename: String,
    pub file_type: FileType,
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// Validate an upload: supported extension, non-empty, within the size limit.
    pub fn new(filename: String, content: Vec<u8>, config: &CoreConfig) -> IngestResult<Self> {
        let file_type = FileType::from_filename(&filename).ok_or_else(|| {
            IngestError::UnsupportedFileType(
                filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("").to_string(),
            )
        })?;

        if content.is_empty() {
            return Err(IngestError::EmptyFile);
        }
        let size = content.len() as u64;
        if size > config.max_upload_bytes() {
            return Err(IngestError::TooLarge {
                size,
                max: config.max_upload_bytes(),
            });
        }

        Ok(Self {
            filename,
            file_type,
            content,
        })
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// The document ingestion backend.
pub trait Ingestor {
    /// Extract text and a structured record from an uploaded document.
    fn ingest(&self, upload: &UploadRequest) -> IngestResult<DocumentResponse>;
}
