//! Medical record extraction from veterinary document text.
//!
//! Turns the raw text of a clinical history into a [`MedicalRecord`] the
//! editor can bind to, either by parsing a model's JSON answer or with the
//! label-based [`MockExtractor`] for development and tests.
//!
//! [`MedicalRecord`]: vet_records_core::models::MedicalRecord

pub mod prompts;
pub mod extraction;

pub use extraction::*;
pub use prompts::*;
