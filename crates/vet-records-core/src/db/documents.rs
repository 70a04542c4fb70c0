//! Document database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{DocumentResponse, MedicalRecord};

const SELECT_DOCUMENT: &str = r#"
    SELECT document_id, filename, file_type, file_size, extracted_text,
           medical_record, created_at
    FROM documents
"#;

impl Database {
    /// Insert a newly ingested document.
    pub fn insert_document(&self, document: &DocumentResponse) -> DbResult<()> {
        let (record_json, record_hash) = match document.medical_record.as_deref() {
            Some(record) => (Some(record.to_json()?), Some(record.fingerprint()?)),
            None => (None, None),
        };

        self.conn.execute(
            r#"
            INSERT INTO documents (
                document_id, filename, file_type, file_size, extracted_text,
                medical_record, record_hash, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
            params![
                document.document_id,
                document.filename,
                document.file_type,
                document.file_size as i64,
                document.extracted_text,
                record_json,
                record_hash,
                document.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a document by ID.
    pub fn get_document(&self, document_id: &str) -> DbResult<Option<DocumentResponse>> {
        self.conn
            .query_row(
                &format!("{SELECT_DOCUMENT} WHERE document_id = ?"),
                [document_id],
                document_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a document by ID, failing when absent.
    pub fn require_document(&self, document_id: &str) -> DbResult<DocumentResponse> {
        self.get_document(document_id)?
            .ok_or_else(|| DbError::NotFound(document_id.to_string()))
    }

    /// Replace a document's medical record.
    ///
    /// Returns false when the document does not exist, or when the record
    /// is identical to the stored one and unchanged writes are skipped.
    pub fn update_medical_record(&self, document_id: &str, record: &MedicalRecord) -> DbResult<bool> {
        let record_json = record.to_json()?;
        let record_hash = record.fingerprint()?;

        if self.skip_unchanged_writes {
            let stored: Option<Option<String>> = self
                .conn
                .query_row(
                    "SELECT record_hash FROM documents WHERE document_id = ?",
                    [document_id],
                    |row| row.get(0),
                )
                .optional()?;
            if stored.flatten().as_deref() == Some(record_hash.as_str()) {
                return Ok(false);
            }
        }

        let rows_affected = self.conn.execute(
            r#"
            UPDATE documents SET
                medical_record = ?2,
                record_hash = ?3,
                updated_at = ?4
            WHERE document_id = ?1
            "#,
            params![
                document_id,
                record_json,
                record_hash,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// List all documents, newest first.
    pub fn list_documents(&self) -> DbResult<Vec<DocumentResponse>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_DOCUMENT} ORDER BY created_at DESC"))?;

        let rows = stmt.query_map([], document_row)?;

        let mut documents: Vec<DocumentResponse> = Vec::new();
        for row in rows {
            documents.push(row?.try_into()?);
        }
        Ok(documents)
    }

    /// Delete a document.
    pub fn delete_document(&self, document_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM documents WHERE document_id = ?", [document_id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct DocumentRow {
    document_id: String,
    filename: String,
    file_type: String,
    file_size: i64,
    extracted_text: Option<String>,
    medical_record: Option<String>,
    created_at: String,
}

fn document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        document_id: row.get(0)?,
        filename: row.get(1)?,
        file_type: row.get(2)?,
        file_size: row.get(3)?,
        extracted_text: row.get(4)?,
        medical_record: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl TryFrom<DocumentRow> for DocumentResponse {
    type Error = DbError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let medical_record = row
            .medical_record
            .map(|json| MedicalRecord::from_json(&json))
            .transpose()?
            .map(MedicalRecord::into_snapshot);

        Ok(DocumentResponse {
            document_id: row.document_id,
            filename: row.filename,
            file_type: row.file_type,
            file_size: row.file_size.max(0) as u64,
            extracted_text: row.extracted_text,
            medical_record,
            created_at: row.created_at,
        })
    }
}
