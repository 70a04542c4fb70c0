//! Ingested document models.

use serde::{Deserialize, Serialize};

use super::record::{MedicalRecord, Snapshot};

/// Response from the ingestion backend for an uploaded document.
///
/// Only `medical_record` feeds the editor; the rest is display data
/// for the preview panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentResponse {
    /// Unique document ID
    pub document_id: String,
    /// Original filename
    pub filename: String,
    /// File type (pdf, jpg, docx, txt, etc.)
    pub file_type: String,
    /// File size in bytes
    pub file_size: u64,
    /// Raw text extracted from the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    /// Structured record extracted from the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_record: Option<Snapshot>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl DocumentResponse {
    /// Create a response for a freshly ingested document.
    pub fn new(filename: String, file_type: String, file_size: u64) -> Self {
        Self {
            document_id: uuid::Uuid::new_v4().to_string(),
            filename,
            file_type,
            file_size,
            extracted_text: None,
            medical_record: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach the extraction output.
    pub fn with_extraction(mut self, text: Option<String>, record: Option<MedicalRecord>) -> Self {
        self.extracted_text = text;
        self.medical_record = record.map(MedicalRecord::into_snapshot);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_response() {
        let doc = DocumentResponse::new("history.pdf".into(), "pdf".into(), 2048);
        assert_eq!(doc.document_id.len(), 36); // UUID format
        assert!(doc.medical_record.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&doc.created_at).is_ok());
    }

    #[test]
    fn test_parse_response_without_record() {
        let json = r#"{
            "document_id": "abc",
            "filename": "scan.png",
            "file_type": "png",
            "file_size": 10,
            "created_at": "2024-01-01T10:00:00Z"
        }"#;
        let doc: DocumentResponse = serde_json::from_str(json).unwrap();
        assert!(doc.extracted_text.is_none());
        assert!(doc.medical_record.is_none());
    }
}
