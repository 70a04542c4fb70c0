//! List keys for the ordered sequences hanging off a visit.

use std::fmt::Debug;
use std::sync::Arc;

use crate::models::{LaboratoryTest, Medication, Vaccination, Visit};

/// An ordered sequence reachable from a visit.
///
/// `items` reads without allocating; `items_mut` creates the sequence
/// (and any nested object holding it) when absent. Callers must only
/// reach for `items_mut` on a visit already copied off the previous
/// snapshot.
pub trait VisitList {
    type Item: Clone + PartialEq + Debug;

    /// Name used in log events.
    const NAME: &'static str;

    fn items(visit: &Visit) -> &[Self::Item];

    fn items_mut(visit: &mut Visit) -> &mut Vec<Self::Item>;
}

/// `visit.diagnosis`
pub struct Diagnosis;

/// `visit.treatment`
pub struct Treatment;

/// `visit.laboratory_tests`
pub struct LaboratoryTests;

/// `visit.vaccinations`
pub struct Vaccinations;

/// `visit.physical_examination.findings`
pub struct ExamFindings;

impl VisitList for Diagnosis {
    type Item = String;
    const NAME: &'static str = "diagnosis";

    fn items(visit: &Visit) -> &[String] {
        visit.diagnosis()
    }

    fn items_mut(visit: &mut Visit) -> &mut Vec<String> {
        visit.diagnosis.get_or_insert_with(Vec::new)
    }
}

impl VisitList for Treatment {
    type Item = Arc<Medication>;
    const NAME: &'static str = "treatment";

    fn items(visit: &Visit) -> &[Arc<Medication>] {
        visit.treatment()
    }

    fn items_mut(visit: &mut Visit) -> &mut Vec<Arc<Medication>> {
        visit.treatment.get_or_insert_with(Vec::new)
    }
}

impl VisitList for LaboratoryTests {
    type Item = Arc<LaboratoryTest>;
    const NAME: &'static str = "laboratory_tests";

    fn items(visit: &Visit) -> &[Arc<LaboratoryTest>] {
        visit.laboratory_tests()
    }

    fn items_mut(visit: &mut Visit) -> &mut Vec<Arc<LaboratoryTest>> {
        visit.laboratory_tests.get_or_insert_with(Vec::new)
    }
}

impl VisitList for Vaccinations {
    type Item = Arc<Vaccination>;
    const NAME: &'static str = "vaccinations";

    fn items(visit: &Visit) -> &[Arc<Vaccination>] {
        visit.vaccinations()
    }

    fn items_mut(visit: &mut Visit) -> &mut Vec<Arc<Vaccination>> {
        visit.vaccinations.get_or_insert_with(Vec::new)
    }
}

impl VisitList for ExamFindings {
    type Item = String;
    const NAME: &'static str = "physical_examination.findings";

    fn items(visit: &Visit) -> &[String] {
        visit
            .physical_examination
            .as_deref()
            .map(|exam| exam.findings())
            .unwrap_or(&[])
    }

    fn items_mut(visit: &mut Visit) -> &mut Vec<String> {
        let exam = visit.physical_examination.get_or_insert_with(Default::default);
        Arc::make_mut(exam).findings.get_or_insert_with(Vec::new)
    }
}
