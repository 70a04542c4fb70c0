//! User intents, each mapping to exactly one engine operation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::{
    self, Diagnosis, ExamEdit, ExamFindings, LabTestEdit, LaboratoryTests, MedicationEdit,
    NestedEdit, RecordEdit, Treatment, VaccinationEdit, Vaccinations, VisitEdit,
};
use crate::models::{LaboratoryTest, MedicalRecord, Medication, Vaccination};

/// A discrete user action on the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "args", rename_all = "snake_case")]
pub enum Intent {
    EditRecord(RecordEdit),

    AddVisit,
    RemoveVisit { visit: usize },
    EditVisit { visit: usize, edit: VisitEdit },
    EditExam { visit: usize, edit: ExamEdit },

    AddDiagnosis { visit: usize, value: String },
    SetDiagnosis { visit: usize, index: usize, value: String },
    RemoveDiagnosis { visit: usize, index: usize },

    AddExamFinding { visit: usize, value: String },
    SetExamFinding { visit: usize, index: usize, value: String },
    RemoveExamFinding { visit: usize, index: usize },

    AddMedication { visit: usize, medication: Medication },
    EditMedication { visit: usize, index: usize, edit: MedicationEdit },
    RemoveMedication { visit: usize, index: usize },

    AddLabTest { visit: usize, test: LaboratoryTest },
    EditLabTest { visit: usize, index: usize, edit: LabTestEdit },
    RemoveLabTest { visit: usize, index: usize },

    AddVaccination { visit: usize, vaccination: Vaccination },
    EditVaccination { visit: usize, index: usize, edit: VaccinationEdit },
    RemoveVaccination { visit: usize, index: usize },
}

impl Intent {
    /// Compute the next record for this intent.
    pub fn apply(self, record: &MedicalRecord) -> MedicalRecord {
        match self {
            Intent::EditRecord(edit) => engine::set_field(record, edit),

            Intent::AddVisit => engine::append_visit(record),
            Intent::RemoveVisit { visit } => engine::remove_visit(record, visit),
            Intent::EditVisit { visit, edit } => engine::set_visit_field(record, visit, edit),
            Intent::EditExam { visit, edit } => {
                engine::set_nested_field(record, visit, NestedEdit::PhysicalExamination(edit))
            }

            Intent::AddDiagnosis { visit, value } => {
                engine::append_list_item::<Diagnosis>(record, visit, value)
            }
            Intent::SetDiagnosis { visit, index, value } => {
                engine::set_list_item::<Diagnosis>(record, visit, index, value)
            }
            Intent::RemoveDiagnosis { visit, index } => {
                engine::remove_list_item::<Diagnosis>(record, visit, index)
            }

            Intent::AddExamFinding { visit, value } => {
                engine::append_list_item::<ExamFindings>(record, visit, value)
            }
            Intent::SetExamFinding { visit, index, value } => {
                engine::set_list_item::<ExamFindings>(record, visit, index, value)
            }
            Intent::RemoveExamFinding { visit, index } => {
                engine::remove_list_item::<ExamFindings>(record, visit, index)
            }

            Intent::AddMedication { visit, medication } => {
                engine::append_list_item::<Treatment>(record, visit, Arc::new(medication))
            }
            Intent::EditMedication { visit, index, edit } => {
                engine::update_list_item::<Treatment>(record, visit, index, |item| {
                    let mut medication = (**item).clone();
                    edit.apply(&mut medication);
                    Arc::new(medication)
                })
            }
            Intent::RemoveMedication { visit, index } => {
                engine::remove_list_item::<Treatment>(record, visit, index)
            }

            Intent::AddLabTest { visit, test } => {
                engine::append_list_item::<LaboratoryTests>(record, visit, Arc::new(test))
            }
            Intent::EditLabTest { visit, index, edit } => {
                engine::update_list_item::<LaboratoryTests>(record, visit, index, |item| {
                    let mut test = (**item).clone();
                    edit.apply(&mut test);
                    Arc::new(test)
                })
            }
            Intent::RemoveLabTest { visit, index } => {
                engine::remove_list_item::<LaboratoryTests>(record, visit, index)
            }

            Intent::AddVaccination { visit, vaccination } => {
                engine::append_list_item::<Vaccinations>(record, visit, Arc::new(vaccination))
            }
            Intent::EditVaccination { visit, index, edit } => {
                engine::update_list_item::<Vaccinations>(record, visit, index, |item| {
                    let mut vaccination = (**item).clone();
                    edit.apply(&mut vaccination);
                    Arc::new(vaccination)
                })
            }
            Intent::RemoveVaccination { visit, index } => {
                engine::remove_list_item::<Vaccinations>(record, visit, index)
            }
        }
    }

    /// Short name for log events.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::EditRecord(_) => "edit_record",
            Intent::AddVisit => "add_visit",
            Intent::RemoveVisit { .. } => "remove_visit",
            Intent::EditVisit { .. } => "edit_visit",
            Intent::EditExam { .. } => "edit_exam",
            Intent::AddDiagnosis { .. } => "add_diagnosis",
            Intent::SetDiagnosis { .. } => "set_diagnosis",
            Intent::RemoveDiagnosis { .. } => "remove_diagnosis",
            Intent::AddExamFinding { .. } => "add_exam_finding",
            Intent::SetExamFinding { .. } => "set_exam_finding",
            Intent::RemoveExamFinding { .. } => "remove_exam_finding",
            Intent::AddMedication { .. } => "add_medication",
            Intent::EditMedication { .. } => "edit_medication",
            Intent::RemoveMedication { .. } => "remove_medication",
            Intent::AddLabTest { .. } => "add_lab_test",
            Intent::EditLabTest { .. } => "edit_lab_test",
            Intent::RemoveLabTest { .. } => "remove_lab_test",
            Intent::AddVaccination { .. } => "add_vaccination",
            Intent::EditVaccination { .. } => "edit_vaccination",
            Intent::RemoveVaccination { .. } => "remove_vaccination",
        }
    }
}
