//! Snapshot sink that writes every edit to the local store.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use super::Database;
use crate::editor::SnapshotSink;
use crate::models::Snapshot;

/// Persists each snapshot as the medical record of one document.
///
/// Failures are logged and dropped; the editor never sees them.
pub struct DocumentStore {
    db: Arc<Mutex<Database>>,
    document_id: String,
    writes: usize,
}

impl DocumentStore {
    pub fn new(db: Arc<Mutex<Database>>, document_id: String) -> Self {
        Self {
            db,
            document_id,
            writes: 0,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Number of snapshots actually written.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SnapshotSink for DocumentStore {
    fn on_save(&mut self, snapshot: &Snapshot) {
        let db = match self.db.lock() {
            Ok(db) => db,
            Err(e) => {
                warn!(document_id = %self.document_id, "store lock poisoned: {}", e);
                return;
            }
        };
        match db.update_medical_record(&self.document_id, snapshot) {
            Ok(true) => {
                self.writes += 1;
                debug!(document_id = %self.document_id, "stored edited record");
            }
            Ok(false) => debug!(document_id = %self.document_id, "record unchanged or document missing"),
            Err(e) => warn!(document_id = %self.document_id, "failed to store record: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Intent, RecordEditor};
    use crate::engine::{PetInfoEdit, RecordEdit};
    use crate::models::{DocumentResponse, MedicalRecord};

    #[test]
    fn test_editor_writes_through_store() {
        let db = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        let doc = DocumentResponse::new("notes.txt".into(), "txt".into(), 20)
            .with_extraction(None, Some(MedicalRecord::empty()));
        db.lock().unwrap().insert_document(&doc).unwrap();

        let store = DocumentStore::new(db.clone(), doc.document_id.clone());
        let mut editor = RecordEditor::from_document(&doc, store);
        editor.apply(Intent::AddVisit);
        editor.apply(Intent::EditRecord(RecordEdit::PetInfo(PetInfoEdit::Name(Some("Kira".into())))));
        // Out-of-range: equal record, write skipped
        editor.apply(Intent::RemoveVisit { visit: 3 });

        assert_eq!(editor.sink().writes(), 2);

        let stored = db.lock().unwrap().require_document(&doc.document_id).unwrap();
        assert_eq!(stored.medical_record.as_ref(), Some(editor.snapshot()));
    }

    #[test]
    fn test_missing_document_is_not_fatal() {
        let db = Arc::new(Mutex::new(Database::open_in_memory().unwrap()));
        let mut editor = RecordEditor::new(DocumentStore::new(db, "missing".into()));
        editor.apply(Intent::AddVisit);

        assert_eq!(editor.snapshot().visit_count(), 1);
        assert_eq!(editor.sink().writes(), 0);
    }
}
