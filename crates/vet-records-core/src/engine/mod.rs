//! Update engine: pure snapshot-to-snapshot operations.
//!
//! Every operation takes the current record by reference and returns a new
//! root. Only the spine from the root to the edited node is copied; every
//! other branch is shared with the input by `Arc`. All operations are total:
//! an out-of-range index yields a record equal to the input.

mod edits;
mod lists;

pub use edits::*;
pub use lists::*;

use std::sync::Arc;

use tracing::trace;

use crate::models::{MedicalRecord, Visit};

/// Replace one field on the root, the pet branch or the clinic branch.
///
/// Missing branches are created before a field edit is applied.
pub fn set_field(record: &MedicalRecord, edit: RecordEdit) -> MedicalRecord {
    let mut next = record.clone();
    match edit {
        RecordEdit::ReplacePetInfo(pet) => next.pet_info = pet.map(Arc::new),
        RecordEdit::ReplaceVeterinaryInfo(info) => next.veterinary_info = info.map(Arc::new),
        RecordEdit::ReplaceVisits(visits) => {
            next.visits = visits.map(|v| v.into_iter().map(Arc::new).collect())
        }
        RecordEdit::PetInfo(edit) => {
            edit.apply(Arc::make_mut(next.pet_info.get_or_insert_with(Default::default)))
        }
        RecordEdit::VeterinaryInfo(edit) => edit.apply(Arc::make_mut(
            next.veterinary_info.get_or_insert_with(Default::default),
        )),
    }
    next
}

/// Replace one of a visit's own fields.
pub fn set_visit_field(record: &MedicalRecord, visit_index: usize, edit: VisitEdit) -> MedicalRecord {
    with_visit(record, visit_index, |visit| edit.apply(visit))
}

/// Replace one field inside a nested object of a visit.
///
/// A missing nested object is treated as empty before the edit.
pub fn set_nested_field(
    record: &MedicalRecord,
    visit_index: usize,
    edit: NestedEdit,
) -> MedicalRecord {
    with_visit(record, visit_index, |visit| match edit {
        NestedEdit::PhysicalExamination(edit) => edit.apply(Arc::make_mut(
            visit.physical_examination.get_or_insert_with(Default::default),
        )),
    })
}

/// Replace the element at `item_index` of a visit's list.
pub fn set_list_item<L: VisitList>(
    record: &MedicalRecord,
    visit_index: usize,
    item_index: usize,
    item: L::Item,
) -> MedicalRecord {
    update_list_item::<L>(record, visit_index, item_index, |_| item)
}

/// Replace the element at `item_index` with a value derived from it.
pub fn update_list_item<L: VisitList>(
    record: &MedicalRecord,
    visit_index: usize,
    item_index: usize,
    update: impl FnOnce(&L::Item) -> L::Item,
) -> MedicalRecord {
    let len = list_len::<L>(record, visit_index);
    if item_index >= len {
        trace!(list = L::NAME, visit_index, item_index, len, "list index out of range");
        return record.clone();
    }
    with_visit(record, visit_index, |visit| {
        let items = L::items_mut(visit);
        let replacement = update(&items[item_index]);
        items[item_index] = replacement;
    })
}

/// Append to a visit's list, creating the list if absent.
pub fn append_list_item<L: VisitList>(
    record: &MedicalRecord,
    visit_index: usize,
    item: L::Item,
) -> MedicalRecord {
    with_visit(record, visit_index, |visit| L::items_mut(visit).push(item))
}

/// Remove the element at `item_index`; later elements shift down by one.
pub fn remove_list_item<L: VisitList>(
    record: &MedicalRecord,
    visit_index: usize,
    item_index: usize,
) -> MedicalRecord {
    let len = list_len::<L>(record, visit_index);
    if item_index >= len {
        trace!(list = L::NAME, visit_index, item_index, len, "list index out of range");
        return record.clone();
    }
    with_visit(record, visit_index, |visit| {
        L::items_mut(visit).remove(item_index);
    })
}

/// Append an empty visit, creating the visit list if absent.
pub fn append_visit(record: &MedicalRecord) -> MedicalRecord {
    let mut next = record.clone();
    next.visits
        .get_or_insert_with(Vec::new)
        .push(Arc::new(Visit::default()));
    next
}

/// Remove the visit at `visit_index`; later visits shift down by one.
pub fn remove_visit(record: &MedicalRecord, visit_index: usize) -> MedicalRecord {
    let mut next = record.clone();
    match next.visits.as_mut() {
        Some(visits) if visit_index < visits.len() => {
            visits.remove(visit_index);
        }
        _ => trace!(visit_index, "visit index out of range"),
    }
    next
}

fn list_len<L: VisitList>(record: &MedicalRecord, visit_index: usize) -> usize {
    record
        .visit(visit_index)
        .map(|visit| L::items(visit).len())
        .unwrap_or(0)
}

/// Copy the root and the targeted visit, then edit the copy.
///
/// The cloned root holds a second reference to every visit, so
/// `Arc::make_mut` always copies the target instead of writing through
/// to the input snapshot.
fn with_visit(
    record: &MedicalRecord,
    visit_index: usize,
    edit: impl FnOnce(&mut Visit),
) -> MedicalRecord {
    let mut next = record.clone();
    match next.visits.as_mut().and_then(|visits| visits.get_mut(visit_index)) {
        Some(visit) => edit(Arc::make_mut(visit)),
        None => trace!(visit_index, "visit index out of range"),
    }
    next
}
