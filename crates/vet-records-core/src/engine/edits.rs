//! Typed field edits, one closed enum per container.
//!
//! Each variant carries the value type of its field, so a text value can
//! never land in a numeric field. `apply` writes into a node that the
//! caller has already copied off the previous snapshot.

use serde::{Deserialize, Serialize};

use crate::form;
use crate::models::{
    LabResults, LaboratoryTest, Medication, PetInfo, PhysicalExamination, Vaccination,
    VeterinaryInfo, Visit,
};

/// Top-level edits on the root record and its single-object branches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", content = "edit", rename_all = "snake_case")]
pub enum RecordEdit {
    /// Replace the whole pet branch
    ReplacePetInfo(Option<PetInfo>),
    /// Replace the whole clinic branch
    ReplaceVeterinaryInfo(Option<VeterinaryInfo>),
    /// Replace the whole visit history
    ReplaceVisits(Option<Vec<Visit>>),
    /// Set one pet field (creates the pet branch if absent)
    PetInfo(PetInfoEdit),
    /// Set one clinic field (creates the clinic branch if absent)
    VeterinaryInfo(VeterinaryInfoEdit),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum PetInfoEdit {
    Name(Option<String>),
    Species(Option<String>),
    Breed(Option<String>),
    BirthDate(Option<String>),
    Sex(Option<String>),
    ReproductiveStatus(Option<String>),
    Weight(Option<f64>),
    Microchip(Option<String>),
    HairType(Option<String>),
    CoatColor(Option<String>),
}

impl PetInfoEdit {
    pub fn apply(self, pet: &mut PetInfo) {
        match self {
            PetInfoEdit::Name(v) => pet.name = form::clear_empty(v),
            PetInfoEdit::Species(v) => pet.species = form::clear_empty(v),
            PetInfoEdit::Breed(v) => pet.breed = form::clear_empty(v),
            PetInfoEdit::BirthDate(v) => pet.birth_date = form::clear_empty(v),
            PetInfoEdit::Sex(v) => pet.sex = form::clear_empty(v),
            PetInfoEdit::ReproductiveStatus(v) => pet.reproductive_status = form::clear_empty(v),
            PetInfoEdit::Weight(v) => pet.weight = v,
            PetInfoEdit::Microchip(v) => pet.microchip = form::clear_empty(v),
            PetInfoEdit::HairType(v) => pet.hair_type = form::clear_empty(v),
            PetInfoEdit::CoatColor(v) => pet.coat_color = form::clear_empty(v),
        }
    }

    /// Weight from raw form input; malformed input clears the field.
    pub fn weight_input(raw: &str) -> Self {
        PetInfoEdit::Weight(form::number(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum VeterinaryInfoEdit {
    ClinicName(Option<String>),
    ClinicAddress(Option<String>),
    ClinicPhone(Option<String>),
}

impl VeterinaryInfoEdit {
    pub fn apply(self, info: &mut VeterinaryInfo) {
        match self {
            VeterinaryInfoEdit::ClinicName(v) => info.clinic_name = form::clear_empty(v),
            VeterinaryInfoEdit::ClinicAddress(v) => info.clinic_address = form::clear_empty(v),
            VeterinaryInfoEdit::ClinicPhone(v) => info.clinic_phone = form::clear_empty(v),
        }
    }
}

/// Edits on a visit's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum VisitEdit {
    VisitDate(Option<String>),
    VisitType(Option<String>),
    ClinicName(Option<String>),
    Reason(Option<String>),
    Anamnesis(Option<String>),
    Plan(Option<String>),
    Observations(Option<String>),
    /// Replace the whole physical examination
    PhysicalExamination(Option<PhysicalExamination>),
}

impl VisitEdit {
    pub fn apply(self, visit: &mut Visit) {
        match self {
            VisitEdit::VisitDate(v) => visit.visit_date = form::clear_empty(v),
            VisitEdit::VisitType(v) => visit.visit_type = form::clear_empty(v),
            VisitEdit::ClinicName(v) => visit.clinic_name = form::clear_empty(v),
            VisitEdit::Reason(v) => visit.reason = form::clear_empty(v),
            VisitEdit::Anamnesis(v) => visit.anamnesis = form::clear_empty(v),
            VisitEdit::Plan(v) => visit.plan = form::clear_empty(v),
            VisitEdit::Observations(v) => visit.observations = form::clear_empty(v),
            VisitEdit::PhysicalExamination(v) => {
                visit.physical_examination = v.map(std::sync::Arc::new)
            }
        }
    }
}

/// Edits on the nested objects hanging off a visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", content = "edit", rename_all = "snake_case")]
pub enum NestedEdit {
    PhysicalExamination(ExamEdit),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ExamEdit {
    Weight(Option<f64>),
    Temperature(Option<f64>),
    HeartRate(Option<f64>),
    RespiratoryRate(Option<f64>),
    MucousMembranes(Option<String>),
    Crt(Option<String>),
    HydrationStatus(Option<String>),
    GeneralCondition(Option<String>),
    AbdominalPalpation(Option<String>),
}

impl ExamEdit {
    pub fn apply(self, exam: &mut PhysicalExamination) {
        match self {
            ExamEdit::Weight(v) => exam.weight = v,
            ExamEdit::Temperature(v) => exam.temperature = v,
            ExamEdit::HeartRate(v) => exam.heart_rate = v,
            ExamEdit::RespiratoryRate(v) => exam.respiratory_rate = v,
            ExamEdit::MucousMembranes(v) => exam.mucous_membranes = form::clear_empty(v),
            ExamEdit::Crt(v) => exam.crt = form::clear_empty(v),
            ExamEdit::HydrationStatus(v) => exam.hydration_status = form::clear_empty(v),
            ExamEdit::GeneralCondition(v) => exam.general_condition = form::clear_empty(v),
            ExamEdit::AbdominalPalpation(v) => exam.abdominal_palpation = form::clear_empty(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum MedicationEdit {
    Name(String),
    Dosage(Option<String>),
    Frequency(Option<String>),
    Duration(Option<String>),
    Route(Option<String>),
    Observations(Option<String>),
}

impl MedicationEdit {
    pub fn apply(self, medication: &mut Medication) {
        match self {
            MedicationEdit::Name(v) => medication.name = v,
            MedicationEdit::Dosage(v) => medication.dosage = form::clear_empty(v),
            MedicationEdit::Frequency(v) => medication.frequency = form::clear_empty(v),
            MedicationEdit::Duration(v) => medication.duration = form::clear_empty(v),
            MedicationEdit::Route(v) => medication.route = form::clear_empty(v),
            MedicationEdit::Observations(v) => medication.observations = form::clear_empty(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LabTestEdit {
    TestName(String),
    TestDate(Option<String>),
    Results(Option<LabResults>),
    SetFinding { index: usize, value: String },
    AppendFinding(String),
    RemoveFinding(usize),
}

impl LabTestEdit {
    /// Results typed into the text input. Always stored as text.
    pub fn results_input(raw: &str) -> Self {
        LabTestEdit::Results(form::text(raw).map(LabResults::Text))
    }

    pub fn apply(self, test: &mut LaboratoryTest) {
        match self {
            LabTestEdit::TestName(v) => test.test_name = v,
            LabTestEdit::TestDate(v) => test.test_date = form::clear_empty(v),
            LabTestEdit::Results(v) => test.results = v,
            LabTestEdit::SetFinding { index, value } => {
                if let Some(slot) = test.findings.as_mut().and_then(|f| f.get_mut(index)) {
                    *slot = value;
                }
            }
            LabTestEdit::AppendFinding(value) => {
                test.findings.get_or_insert_with(Vec::new).push(value)
            }
            LabTestEdit::RemoveFinding(index) => {
                if let Some(findings) = test.findings.as_mut() {
                    if index < findings.len() {
                        findings.remove(index);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum VaccinationEdit {
    VaccineName(String),
    DateAdministered(Option<String>),
    NextDoseDate(Option<String>),
    Applied(bool),
}

impl VaccinationEdit {
    pub fn apply(self, vaccination: &mut Vaccination) {
        match self {
            VaccinationEdit::VaccineName(v) => vaccination.vaccine_name = v,
            VaccinationEdit::DateAdministered(v) => vaccination.date_administered = form::clear_empty(v),
            VaccinationEdit::NextDoseDate(v) => vaccination.next_dose_date = form::clear_empty(v),
            VaccinationEdit::Applied(v) => vaccination.applied = v,
        }
    }
}
