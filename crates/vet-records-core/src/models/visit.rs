//! Visit models and the records nested under a visit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One clinical encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<String>,
    /// Consultation, emergency, follow-up, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anamnesis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_examination: Option<Arc<PhysicalExamination>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<Vec<Arc<Medication>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laboratory_tests: Option<Vec<Arc<LaboratoryTest>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccinations: Option<Vec<Arc<Vaccination>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

impl Visit {
    pub fn diagnosis(&self) -> &[String] {
        self.diagnosis.as_deref().unwrap_or(&[])
    }

    pub fn treatment(&self) -> &[Arc<Medication>] {
        self.treatment.as_deref().unwrap_or(&[])
    }

    pub fn laboratory_tests(&self) -> &[Arc<LaboratoryTest>] {
        self.laboratory_tests.as_deref().unwrap_or(&[])
    }

    pub fn vaccinations(&self) -> &[Arc<Vaccination>] {
        self.vaccinations.as_deref().unwrap_or(&[])
    }
}

/// Vitals and descriptive findings from a physical exam.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PhysicalExamination {
    /// Weight in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    /// Breaths per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mucous_membranes: Option<String>,
    /// Capillary refill time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydration_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abdominal_palpation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<Vec<String>>,
}

impl PhysicalExamination {
    pub fn findings(&self) -> &[String] {
        self.findings.as_deref().unwrap_or(&[])
    }
}

/// A prescribed or administered medication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// Drug name (may be empty while being typed)
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Route of administration (PO, IV, SQ, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

impl Medication {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A laboratory test and its results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LaboratoryTest {
    pub test_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<LabResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<Vec<String>>,
}

impl LaboratoryTest {
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            ..Self::default()
        }
    }

    pub fn findings(&self) -> &[String] {
        self.findings.as_deref().unwrap_or(&[])
    }
}

/// Lab results as free text or as a structured mapping (e.g. analyte → value).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LabResults {
    Text(String),
    Structured(serde_json::Map<String, serde_json::Value>),
}

impl LabResults {
    /// Render for a text input.
    ///
    /// Structured results render as pretty-printed JSON; they stay
    /// structured in the record until the text is edited.
    pub fn display_text(&self) -> String {
        match self {
            LabResults::Text(text) => text.clone(),
            LabResults::Structured(map) => {
                serde_json::to_string_pretty(map).unwrap_or_default()
            }
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, LabResults::Structured(_))
    }
}

/// A vaccine administration (or a scheduled one when `applied` is false).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vaccination {
    pub vaccine_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_administered: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_dose_date: Option<String>,
    #[serde(default = "default_applied")]
    pub applied: bool,
}

fn default_applied() -> bool {
    true
}

impl Vaccination {
    /// Create a vaccination, marked as applied.
    pub fn new(vaccine_name: impl Into<String>) -> Self {
        Self {
            vaccine_name: vaccine_name.into(),
            date_administered: None,
            next_dose_date: None,
            applied: true,
        }
    }
}

impl Default for Vaccination {
    fn default() -> Self {
        Self::new(String::new())
    }
}
