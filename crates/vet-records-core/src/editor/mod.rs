//! Edit surface: owns the current snapshot and applies user intents.
//!
//! ```text
//!   initial data ──► RecordEditor ──► Intent::apply ──► new Snapshot
//!                         │                                  │
//!                         └──────── SnapshotSink::on_save ◄──┘
//! ```
//!
//! Every accepted intent replaces the held snapshot and notifies the sink
//! synchronously with the full record. Incoming initial data always wins
//! over unsaved edits.

mod intent;

pub use intent::*;

use std::sync::Arc;

use tracing::debug;

use crate::models::{DocumentResponse, MedicalRecord, Snapshot};

/// Receives every snapshot the editor produces.
pub trait SnapshotSink {
    fn on_save(&mut self, snapshot: &Snapshot);
}

impl<F> SnapshotSink for F
where
    F: FnMut(&Snapshot),
{
    fn on_save(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Sink that drops every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl SnapshotSink for NoopSink {
    fn on_save(&mut self, _snapshot: &Snapshot) {}
}

/// Editor binding state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// No initial data received yet; holding an empty record
    Uninitialized,
    /// Holding a record derived from initial data
    Bound,
}

/// Stateful holder of the current medical record snapshot.
pub struct RecordEditor<S: SnapshotSink> {
    state: EditorState,
    current: Snapshot,
    /// Last initial data received, for identity comparison
    source: Option<Snapshot>,
    sink: S,
}

impl<S: SnapshotSink> RecordEditor<S> {
    /// Create an editor holding an empty record.
    pub fn new(sink: S) -> Self {
        Self {
            state: EditorState::Uninitialized,
            current: MedicalRecord::empty().into_snapshot(),
            source: None,
            sink,
        }
    }

    /// Create an editor, binding `initial` if present.
    pub fn with_initial(initial: Option<Snapshot>, sink: S) -> Self {
        let mut editor = Self::new(sink);
        editor.receive_initial_data(initial);
        editor
    }

    /// Create an editor for an ingested document's record.
    pub fn from_document(document: &DocumentResponse, sink: S) -> Self {
        Self::with_initial(document.medical_record.clone(), sink)
    }

    /// Accept initial data from the caller.
    ///
    /// A snapshot with a new identity replaces the current record wholesale,
    /// discarding unsaved edits. `None` and the previously received snapshot
    /// are ignored. The sink is not notified.
    pub fn receive_initial_data(&mut self, initial: Option<Snapshot>) {
        let Some(initial) = initial else {
            return;
        };
        if self
            .source
            .as_ref()
            .is_some_and(|source| Arc::ptr_eq(source, &initial))
        {
            return;
        }
        debug!(
            previous_state = ?self.state,
            visits = initial.visit_count(),
            "replacing record with initial data"
        );
        self.current = initial.clone();
        self.source = Some(initial);
        self.state = EditorState::Bound;
    }

    /// Apply one intent, store the result and notify the sink.
    pub fn apply(&mut self, intent: Intent) -> &Snapshot {
        debug!(intent = intent.name(), state = ?self.state, "applying intent");
        let next = intent.apply(&self.current).into_snapshot();
        self.current = next;
        self.sink.on_save(&self.current);
        &self.current
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.current
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
