//! Root record, pet and clinic models.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::visit::Visit;

/// One immutable value of a medical record at a point in time.
pub type Snapshot = Arc<MedicalRecord>;

/// A veterinary medical record extracted from a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_info: Option<Arc<PetInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veterinary_info: Option<Arc<VeterinaryInfo>>,
    /// Visits in entry order (not necessarily date order)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visits: Option<Vec<Arc<Visit>>>,
}

impl MedicalRecord {
    /// Create an empty record (no pet, no clinic, no visits).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap into a shareable snapshot.
    pub fn into_snapshot(self) -> Snapshot {
        Arc::new(self)
    }

    /// Visits as a slice, empty when absent.
    pub fn visits(&self) -> &[Arc<Visit>] {
        self.visits.as_deref().unwrap_or(&[])
    }

    /// Get a visit by index.
    pub fn visit(&self, index: usize) -> Option<&Visit> {
        self.visits().get(index).map(Arc::as_ref)
    }

    /// Number of visits.
    pub fn visit_count(&self) -> usize {
        self.visits().len()
    }

    /// Serialize to JSON with absent fields omitted.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// SHA-256 hex digest of the JSON form.
    ///
    /// Field order follows the struct definitions, so equal records
    /// always hash equal.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        Ok(hex::encode(Sha256::digest(json.as_bytes())))
    }
}

/// Pet identity and biometrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PetInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Species (e.g., "Canine", "Feline")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    /// Neutered, intact, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reproductive_status: Option<String>,
    /// Weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microchip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coat_color: Option<String>,
}

/// Clinic identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VeterinaryInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_phone: Option<String>,
}
