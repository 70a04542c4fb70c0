//! Vet-Records Core Library
//!
//! Editable veterinary medical records extracted from uploaded documents.
//!
//! # Architecture
//!
//! ```text
//! Upload → Ingestor (OCR + extraction) → DocumentResponse
//!                                              │
//!                                     medical_record (Snapshot)
//!                                              │
//!                                      ┌───────▼────────┐
//!            user intent ─────────────►│  RecordEditor  │
//!                                      │  Intent::apply │──► engine::* (pure)
//!                                      └───────┬────────┘
//!                                              │ full snapshot, every edit
//!                                              ▼
//!                                        SnapshotSink
//!                                    (DocumentStore, UI, ...)
//! ```
//!
//! # Core Principle
//!
//! **Snapshots are immutable.** Every edit produces a new root that shares
//! all untouched branches with the previous one by `Arc`.
//!
//! # Modules
//!
//! - [`models`]: Record types (MedicalRecord, Visit, Medication, etc.)
//! - [`engine`]: Pure snapshot-to-snapshot update operations
//! - [`editor`]: Stateful edit surface and user intents
//! - [`form`]: Form input parsing and display
//! - [`ingest`]: Upload validation, ingestion seam and preview data
//! - [`db`]: SQLite store for documents and edited records
//! - [`config`]: Runtime configuration

pub mod config;
pub mod db;
pub mod editor;
pub mod engine;
pub mod form;
pub mod ingest;
pub mod models;

// Re-export commonly used types
pub use config::{CoreConfig, DatabaseLocation};
pub use db::{Database, DocumentStore};
pub use editor::{EditorState, Intent, NoopSink, RecordEditor, SnapshotSink};
pub use ingest::{FileType, Ingestor, IngestError, IngestResult, UploadRequest};
pub use models::{
    DocumentResponse, LabResults, LaboratoryTest, MedicalRecord, Medication, PetInfo,
    PhysicalExamination, Snapshot, Vaccination, VeterinaryInfo, Visit,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VetRecordsError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for VetRecordsError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(id) => VetRecordsError::NotFound(id),
            other => VetRecordsError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for VetRecordsError {
    fn from(e: serde_json::Error) -> Self {
        VetRecordsError::SerializationError(e.to_string())
    }
}

impl From<config::ConfigError> for VetRecordsError {
    fn from(e: config::ConfigError) -> Self {
        VetRecordsError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for VetRecordsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VetRecordsError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<VetRecordsCore>, VetRecordsError> {
    let config = CoreConfig::with_database_path(path)?;
    let db = Database::open(&config)?;
    Ok(Arc::new(VetRecordsCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<VetRecordsCore>, VetRecordsError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(VetRecordsCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Parse a numeric form input; malformed input yields nothing.
#[uniffi::export]
pub fn parse_numeric_input(raw: String) -> Option<f64> {
    form::number(&raw)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe document store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct VetRecordsCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl VetRecordsCore {
    /// Store a document response from the ingestion backend. Returns its ID.
    pub fn save_document(&self, document_json: String) -> Result<String, VetRecordsError> {
        let document: DocumentResponse = serde_json::from_str(&document_json)?;
        let db = self.db.lock()?;
        db.insert_document(&document)?;
        Ok(document.document_id)
    }

    /// Get a document as JSON.
    pub fn get_document(&self, document_id: String) -> Result<Option<String>, VetRecordsError> {
        let db = self.db.lock()?;
        let document = db.get_document(&document_id)?;
        Ok(document.map(|d| serde_json::to_string(&d)).transpose()?)
    }

    /// List stored documents, newest first.
    pub fn list_documents(&self) -> Result<Vec<FfiDocumentSummary>, VetRecordsError> {
        let db = self.db.lock()?;
        let documents = db.list_documents()?;
        Ok(documents.iter().map(FfiDocumentSummary::from).collect())
    }

    /// Delete a document.
    pub fn delete_document(&self, document_id: String) -> Result<bool, VetRecordsError> {
        let db = self.db.lock()?;
        Ok(db.delete_document(&document_id)?)
    }

    /// Open an editor bound to a stored document's record.
    ///
    /// Every applied intent is written back to the store.
    pub fn open_editor(&self, document_id: String) -> Result<Arc<FfiRecordEditor>, VetRecordsError> {
        let document = self.db.lock()?.require_document(&document_id)?;
        let store = DocumentStore::new(self.db.clone(), document_id);
        Ok(Arc::new(FfiRecordEditor {
            editor: Mutex::new(RecordEditor::from_document(&document, store)),
        }))
    }
}

// =========================================================================
// Editor Object
// =========================================================================

/// Record editor for FFI. Intents and snapshots cross the boundary as JSON.
#[derive(uniffi::Object)]
pub struct FfiRecordEditor {
    editor: Mutex<RecordEditor<DocumentStore>>,
}

#[uniffi::export]
impl FfiRecordEditor {
    /// Apply a JSON-encoded intent and return the new snapshot as JSON.
    pub fn apply_intent(&self, intent_json: String) -> Result<String, VetRecordsError> {
        let intent: Intent = serde_json::from_str(&intent_json)
            .map_err(|e| VetRecordsError::InvalidInput(format!("intent: {}", e)))?;
        let mut editor = self.editor.lock()?;
        Ok(editor.apply(intent).to_json()?)
    }

    /// Current snapshot as JSON.
    pub fn snapshot_json(&self) -> Result<String, VetRecordsError> {
        let editor = self.editor.lock()?;
        Ok(editor.snapshot().to_json()?)
    }

    /// Replace the record with fresh data (e.g. re-extraction). Discards edits.
    pub fn reload(&self, record_json: String) -> Result<(), VetRecordsError> {
        let record = MedicalRecord::from_json(&record_json)?;
        let mut editor = self.editor.lock()?;
        editor.receive_initial_data(Some(record.into_snapshot()));
        Ok(())
    }

    pub fn state(&self) -> Result<FfiEditorState, VetRecordsError> {
        let editor = self.editor.lock()?;
        Ok(editor.state().into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiEditorState {
    Uninitialized,
    Bound,
}

impl From<EditorState> for FfiEditorState {
    fn from(state: EditorState) -> Self {
        match state {
            EditorState::Uninitialized => FfiEditorState::Uninitialized,
            EditorState::Bound => FfiEditorState::Bound,
        }
    }
}

/// FFI-safe document list entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDocumentSummary {
    pub document_id: String,
    pub filename: String,
    pub size_label: String,
    pub type_label: String,
    pub created_at: String,
    pub has_record: bool,
}

impl From<&DocumentResponse> for FfiDocumentSummary {
    fn from(document: &DocumentResponse) -> Self {
        let summary = ingest::DocumentSummary::new(Some(document), None);
        Self {
            document_id: document.document_id.clone(),
            filename: summary.filename,
            size_label: summary.size_label,
            type_label: summary.type_label,
            created_at: document.created_at.clone(),
            has_record: document.medical_record.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_document(core: &VetRecordsCore) -> String {
        let document = DocumentResponse::new("history.pdf".into(), "pdf".into(), 1024)
            .with_extraction(None, Some(MedicalRecord::empty()));
        core.save_document(serde_json::to_string(&document).unwrap())
            .unwrap()
    }

    #[test]
    fn test_editor_round_trip_through_ffi() {
        let core = open_database_in_memory().unwrap();
        let document_id = stored_document(&core);

        let editor = core.open_editor(document_id.clone()).unwrap();
        assert_eq!(editor.state().unwrap(), FfiEditorState::Bound);

        editor.apply_intent(r#"{"intent":"add_visit"}"#.into()).unwrap();
        let snapshot = editor
            .apply_intent(
                r#"{"intent":"edit_exam","args":{"visit":0,"edit":{"field":"temperature","value":38.5}}}"#
                    .into(),
            )
            .unwrap();
        assert_eq!(
            snapshot,
            r#"{"visits":[{"physical_examination":{"temperature":38.5}}]}"#
        );

        let stored = core.get_document(document_id).unwrap().unwrap();
        assert!(stored.contains(r#""temperature":38.5"#));
    }

    #[test]
    fn test_invalid_intent_is_rejected() {
        let core = open_database_in_memory().unwrap();
        let document_id = stored_document(&core);
        let editor = core.open_editor(document_id).unwrap();

        let result = editor.apply_intent(r#"{"intent":"fly"}"#.into());
        assert!(matches!(result, Err(VetRecordsError::InvalidInput(_))));
        assert_eq!(editor.snapshot_json().unwrap(), "{}");
    }

    #[test]
    fn test_cleared_field_is_dropped_from_snapshot() {
        let core = open_database_in_memory().unwrap();
        let document_id = stored_document(&core);
        let editor = core.open_editor(document_id).unwrap();

        editor.apply_intent(r#"{"intent":"add_visit"}"#.into()).unwrap();
        editor
            .apply_intent(
                r#"{"intent":"edit_visit","args":{"visit":0,"edit":{"field":"reason","value":"V"}}}"#
                    .into(),
            )
            .unwrap();
        let cleared = editor
            .apply_intent(
                r#"{"intent":"edit_visit","args":{"visit":0,"edit":{"field":"reason","value":""}}}"#
                    .into(),
            )
            .unwrap();
        assert_eq!(cleared, r#"{"visits":[{}]}"#);

        let named = editor
            .apply_intent(
                r#"{"intent":"edit_record","args":{"target":"pet_info","edit":{"field":"name","value":""}}}"#
                    .into(),
            )
            .unwrap();
        assert_eq!(named, r#"{"pet_info":{},"visits":[{}]}"#);
    }

    #[test]
    fn test_open_editor_for_missing_document() {
        let core = open_database_in_memory().unwrap();
        let result = core.open_editor("nope".into());
        assert!(matches!(result, Err(VetRecordsError::NotFound(_))));
    }

    #[test]
    fn test_reload_replaces_record() {
        let core = open_database_in_memory().unwrap();
        let editor = core.open_editor(stored_document(&core)).unwrap();
        editor.apply_intent(r#"{"intent":"add_visit"}"#.into()).unwrap();

        editor
            .reload(r#"{"pet_info":{"name":"Luna"}}"#.into())
            .unwrap();
        assert_eq!(editor.snapshot_json().unwrap(), r#"{"pet_info":{"name":"Luna"}}"#);
    }

    #[test]
    fn test_list_documents() {
        let core = open_database_in_memory().unwrap();
        let id = stored_document(&core);

        let listed = core.list_documents().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].document_id, id);
        assert_eq!(listed[0].type_label, "PDF");
        assert!(listed[0].has_record);

        assert!(core.delete_document(id).unwrap());
        assert!(core.list_documents().unwrap().is_empty());
    }

    #[test]
    fn test_parse_numeric_input() {
        assert_eq!(parse_numeric_input("4.2".into()), Some(4.2));
        assert_eq!(parse_numeric_input("four".into()), None);
    }
}
