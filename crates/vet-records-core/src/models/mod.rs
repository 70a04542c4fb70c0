//! Domain models for the veterinary medical record.
//!
//! Every field is optional: absence means "unknown", never an error.
//! Branches are `Arc`-wrapped so successive snapshots can share the
//! substructure an edit did not touch.

mod document;
mod record;
mod visit;

pub use document::*;
pub use record::*;
pub use visit::*;
