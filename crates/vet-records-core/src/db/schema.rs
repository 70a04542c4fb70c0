//! SQLite schema definition.

/// Complete database schema for the local document store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Ingested documents and their editable medical records
-- ============================================================================

CREATE TABLE IF NOT EXISTS documents (
    document_id TEXT PRIMARY KEY,
    filename TEXT NOT NULL,
    file_type TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    extracted_text TEXT,
    medical_record TEXT,                          -- JSON MedicalRecord
    record_hash TEXT,                             -- SHA-256 hex of medical_record
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at);
"#;
