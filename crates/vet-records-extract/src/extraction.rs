//! Medical record extraction from model output and labeled text.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use vet_records_core::form;
use vet_records_core::ingest::{FileType, IngestError, IngestResult, Ingestor, UploadRequest};
use vet_records_core::models::{
    DocumentResponse, LabResults, LaboratoryTest, MedicalRecord, Medication, PetInfo,
    PhysicalExamination, VeterinaryInfo, Visit,
};

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

impl From<ExtractionError> for IngestError {
    fn from(e: ExtractionError) -> Self {
        IngestError::Extraction(e.to_string())
    }
}

/// Parse a model's answer into a record.
pub fn parse_record_output(output: &str) -> ExtractionResult<MedicalRecord> {
    // Models often wrap the object in prose
    let json_start = output.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = output.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let record = MedicalRecord::from_json(&output[json_start..=json_end])?;
    Ok(record)
}

/// Mock extractor for testing without a model.
///
/// Reads `Label: value` lines and unit-suffixed numbers from Spanish
/// clinical histories. The history is cut into visits at header lines
/// (`= 08/12/19 - 16:12`, `VISITA DEL DIA 08/12/2019`, `Visita 2`); text
/// without any header is read as a single visit.
pub struct MockExtractor;

impl MockExtractor {
    pub fn extract(text: &str) -> MedicalRecord {
        let pet_info = extract_pet_info(text);
        let veterinary_info = extract_veterinary_info(text);

        let sections = visit_sections(text);
        let drafts: Vec<Visit> = if sections.is_empty() {
            vec![extract_visit(text, None)]
        } else {
            sections
                .into_iter()
                .map(|section| extract_visit(&section.body(), section.date))
                .collect()
        };
        let visits: Vec<Arc<Visit>> = drafts
            .into_iter()
            .filter(|visit| *visit != Visit::default())
            .map(Arc::new)
            .collect();

        let record = MedicalRecord {
            pet_info: (pet_info != PetInfo::default()).then(|| Arc::new(pet_info)),
            veterinary_info: (veterinary_info != VeterinaryInfo::default())
                .then(|| Arc::new(veterinary_info)),
            visits: (!visits.is_empty()).then_some(visits),
        };
        debug!(
            pet_info = record.pet_info.is_some(),
            veterinary_info = record.veterinary_info.is_some(),
            visits = record.visit_count(),
            "mock extraction finished"
        );
        record
    }
}

/// Ingestor backed by [`MockExtractor`].
///
/// Only plain-text uploads are read; other types come back with metadata
/// and no extraction.
pub struct MockIngestor;

impl Ingestor for MockIngestor {
    fn ingest(&self, upload: &UploadRequest) -> IngestResult<DocumentResponse> {
        let document = DocumentResponse::new(
            upload.filename.clone(),
            upload.file_type.extension().to_string(),
            upload.size(),
        );

        if upload.file_type != FileType::Txt {
            debug!(
                filename = %upload.filename,
                file_type = upload.file_type.extension(),
                "no text extraction for file type"
            );
            return Ok(document);
        }

        let text = String::from_utf8(upload.content.clone())
            .map_err(|e| ExtractionError::InvalidFormat(format!("text is not UTF-8: {}", e)))?;
        let record = MockExtractor::extract(&text);
        info!(
            document_id = %document.document_id,
            visits = record.visit_count(),
            "extracted record from text upload"
        );
        Ok(document.with_extraction(Some(text), Some(record)))
    }
}

/// Lines below one visit header.
struct VisitSection<'a> {
    date: Option<String>,
    lines: Vec<&'a str>,
}

impl VisitSection<'_> {
    fn body(&self) -> String {
        self.lines.join("\n")
    }
}

/// Visits in header order. Text above the first header is patient data.
fn visit_sections(text: &str) -> Vec<VisitSection<'_>> {
    let mut sections: Vec<VisitSection<'_>> = Vec::new();
    for line in text.lines() {
        match visit_header(line) {
            Some(date) => sections.push(VisitSection {
                date,
                lines: Vec::new(),
            }),
            None => {
                if let Some(section) = sections.last_mut() {
                    section.lines.push(line);
                }
            }
        }
    }
    sections
}

/// `Some` for a visit header line, holding the header's date if it has one.
fn visit_header(line: &str) -> Option<Option<String>> {
    let lower = line.trim().to_lowercase();

    // "= 08/12/19 - 16:12", "- 08/12/19"
    if let Some(rest) = lower.strip_prefix(|c: char| c == '=' || c == '-') {
        let token = rest.split_whitespace().next()?;
        return date_token(token).map(|date| Some(normalize_date(date)));
    }

    let mut words = lower.split_whitespace();
    if !matches!(words.next(), Some("visita" | "consulta")) {
        return None;
    }
    let rest: Vec<&str> = words.collect();
    let date = rest.iter().find_map(|word| date_token(word)).map(normalize_date);
    // "VISITA DE CONTROL DEL DIA 08/12/2019"
    let dated = date.is_some() && (lower.contains("del dia") || lower.contains("del día"));
    // "Visita 2", "Consulta 3:"
    let numbered = rest.first().is_some_and(|word| {
        let number = word.trim_end_matches(|c: char| c == ':' || c == '.');
        !number.is_empty() && number.chars().all(|c| c.is_ascii_digit())
    });
    (dated || numbered).then_some(date)
}

/// "08/12/19", "8-12-2019" or "2019-12-08", trailing punctuation dropped.
fn date_token(word: &str) -> Option<&str> {
    let token = word.trim_end_matches(|c: char| matches!(c, ',' | '.' | ':' | ';'));
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.chars().all(|c| c.is_ascii_digit())
    };
    let parts: Vec<&str> = token.split(|c: char| c == '/' || c == '-').collect();
    let valid = match parts.as_slice() {
        &[day, month, year] if digits(day, 1, 2) => digits(month, 1, 2) && digits(year, 2, 4),
        &[year, month, day] => digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2),
        _ => false,
    };
    valid.then_some(token)
}

fn extract_pet_info(text: &str) -> PetInfo {
    PetInfo {
        name: labeled_value(text, &["Nombre", "Paciente", "Mascota"])
            .as_deref()
            .and_then(first_word),
        species: extract_species(text),
        breed: labeled_value(text, &["Raza"]),
        birth_date: labeled_value(text, &["Nacimiento"])
            .as_deref()
            .and_then(first_word)
            .map(|raw| normalize_date(&raw)),
        sex: labeled_value(text, &["Sexo"]).as_deref().and_then(first_word),
        reproductive_status: labeled_value(text, &["Estado"])
            .as_deref()
            .and_then(first_word),
        weight: None,
        microchip: labeled_value(text, &["Microchip", "Chip"]).and_then(|value| {
            let chip: String = value
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == ' ')
                .collect();
            form::text(chip.trim())
        }),
        hair_type: labeled_value(text, &["Pelo"]).as_deref().and_then(first_word),
        coat_color: labeled_value(text, &["Capa"]).as_deref().and_then(first_word),
    }
}

fn extract_species(text: &str) -> Option<String> {
    if let Some(word) = labeled_value(text, &["Especie", "Tipo"])
        .as_deref()
        .and_then(first_word)
    {
        return Some(species_from_word(&word).unwrap_or_else(|| capitalize(&word)));
    }
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .find_map(species_from_word)
}

fn species_from_word(word: &str) -> Option<String> {
    match word.to_lowercase().as_str() {
        "perro" | "perra" | "canino" | "canina" => Some("Canine".to_string()),
        "gato" | "gata" | "felino" | "felina" => Some("Feline".to_string()),
        "conejo" | "hurón" | "huron" | "loro" => Some(capitalize(word)),
        _ => None,
    }
}

fn extract_veterinary_info(text: &str) -> VeterinaryInfo {
    let clinic_name = labeled_value(text, &["Clínica", "Clinica", "Centro", "Hospital"])
        .or_else(|| {
            // Letterhead: first lines that are not labels or section titles
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .take(5)
                .find(|line| {
                    let lower = line.to_lowercase();
                    !line.contains(':')
                        && !["fecha", "datos", "historial"]
                            .iter()
                            .any(|k| lower.contains(k))
                })
                .map(str::to_string)
        });

    VeterinaryInfo {
        clinic_name,
        clinic_address: labeled_value(text, &["Dirección", "Direccion", "Domicilio"]),
        clinic_phone: labeled_value(text, &["Teléfono", "Telefono", "Telf", "Tel"]).and_then(
            |value| {
                let phone: String = value
                    .chars()
                    .filter(|c| c.is_ascii_digit() || matches!(*c, ' ' | '+'))
                    .collect();
                form::text(phone.trim())
            },
        ),
    }
}

/// One visit from its section text. A date in the header wins over a
/// `Fecha:` line.
fn extract_visit(text: &str, header_date: Option<String>) -> Visit {
    let exam = PhysicalExamination {
        weight: number_with_unit(text, &["kg", "kgs", "kilos"]),
        temperature: number_with_unit(text, &["ºc", "°c"]),
        heart_rate: number_with_unit(text, &["lpm", "ppm"]),
        respiratory_rate: number_with_unit(text, &["rpm"]),
        ..PhysicalExamination::default()
    };

    Visit {
        visit_date: header_date.or_else(|| {
            labeled_value(text, &["Fecha de visita", "Fecha"])
                .as_deref()
                .and_then(first_word)
                .map(|raw| normalize_date(&raw))
        }),
        visit_type: labeled_value(text, &["Tipo de visita"]),
        reason: labeled_value(text, &["Motivo", "Consulta por", "Razón"])
            .or_else(|| attended_for(text)),
        anamnesis: Section::find(text, &["Anamnesis"]).map(|s| s.text()),
        physical_examination: (exam != PhysicalExamination::default()).then(|| Arc::new(exam)),
        diagnosis: Section::find(text, &["Diagnóstico", "Diagnostico", "Dx"])
            .map(|s| s.entries()),
        treatment: Section::find(text, &["Tratamiento", "Tx", "Receta"]).map(|s| {
            s.entries()
                .into_iter()
                .map(|name| Arc::new(Medication::new(name)))
                .collect()
        }),
        laboratory_tests: extract_laboratory_tests(text),
        plan: Section::find(text, &["Plan", "Revisión", "Revision"]).map(|s| s.text()),
        observations: Section::find(text, &["Observaciones"]).map(|s| s.text()),
        ..Visit::default()
    }
}

/// "Acude a consulta por vómitos." -> "vómitos"
fn attended_for(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let rest = &line[find_word(line, "Acude")?..];
        let (_, reason) = [" por ", " para "]
            .iter()
            .find_map(|sep| rest.split_once(*sep))?;
        form::text(reason.split('.').next().unwrap_or_default().trim())
    })
}

const LAB_TESTS: [&str; 8] = [
    "Analítica",
    "Analitica",
    "Radiografía",
    "Radiografia",
    "Ecografía",
    "Ecografia",
    "Coprológico",
    "Coprologico",
];

fn names_lab_test(line: &str) -> Option<usize> {
    LAB_TESTS.iter().find_map(|kind| find_word(line, kind))
}

/// One test per line that names a test kind. Results follow the colon, or
/// sit on the next line when the test line has none.
fn extract_laboratory_tests(text: &str) -> Option<Vec<Arc<LaboratoryTest>>> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let tests: Vec<Arc<LaboratoryTest>> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let named = &line[names_lab_test(line)?..];
            let (name, results) = match named.split_once(':') {
                Some((name, results)) => (name, results),
                None => (
                    named,
                    lines
                        .get(i + 1)
                        .copied()
                        .filter(|next| !is_label_line(next) && names_lab_test(next).is_none())
                        .unwrap_or_default(),
                ),
            };
            let mut test = LaboratoryTest::new(name.trim());
            test.results = form::text(results.trim()).map(LabResults::Text);
            Some(Arc::new(test))
        })
        .collect();
    (!tests.is_empty()).then_some(tests)
}

/// Block opened by a line starting with `Label:`, running to a blank
/// line, the next label or the next visit header.
struct Section<'a> {
    /// Text after the colon on the label line
    inline: Option<&'a str>,
    lines: Vec<&'a str>,
}

impl<'a> Section<'a> {
    fn find(text: &'a str, labels: &[&str]) -> Option<Self> {
        let mut lines = text.lines();
        let inline = lines
            .by_ref()
            .find_map(|line| line_label_value(line, labels))?
            .trim();
        let lines: Vec<&str> = lines
            .map(str::trim)
            .take_while(|line| {
                !line.is_empty() && !is_label_line(line) && visit_header(line).is_none()
            })
            .map(|line| {
                line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '•'))
                    .trim()
            })
            .filter(|line| !line.is_empty())
            .collect();
        let section = Section {
            inline: Some(inline).filter(|value| !value.is_empty()),
            lines,
        };
        (section.inline.is_some() || !section.lines.is_empty()).then_some(section)
    }

    fn text(&self) -> String {
        self.inline
            .into_iter()
            .chain(self.lines.iter().copied())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Comma-separated on the label line, one per line below it.
    fn entries(&self) -> Vec<String> {
        let mut entries = self.inline.map(split_items).unwrap_or_default();
        entries.extend(self.lines.iter().map(|line| line.to_string()));
        entries
    }
}

/// Value after `Label:` when the line starts with one of `labels`.
fn line_label_value<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    let line = line.trim_start();
    labels.iter().find_map(|label| {
        let head = line.get(..label.len())?;
        if !head.eq_ignore_ascii_case(label) {
            return None;
        }
        line[label.len()..].trim_start().strip_prefix(':')
    })
}

/// "Diagnóstico:" or "Tipo de visita: Control", not "Revisión a las 16:30".
fn is_label_line(line: &str) -> bool {
    line.split_once(':').is_some_and(|(head, _)| {
        let words: Vec<&str> = head.split_whitespace().collect();
        (1..=3).contains(&words.len())
            && words.iter().all(|word| word.chars().all(char::is_alphabetic))
    })
}

/// Byte offset of the first `needle` that starts a word, ignoring ASCII case.
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack.char_indices().find_map(|(i, _)| {
        let starts_word = haystack[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let found = haystack
            .as_bytes()
            .get(i..i + needle.len())
            .is_some_and(|window| window.eq_ignore_ascii_case(needle));
        (starts_word && found).then_some(i)
    })
}

/// Value after the first `Label:` found for any of `labels`, cut before
/// a following label on the same line.
fn labeled_value(text: &str, labels: &[&str]) -> Option<String> {
    for line in text.lines() {
        for label in labels {
            let Some(pos) = find_word(line, label) else {
                continue;
            };
            let Some(value) = line[pos + label.len()..].trim_start().strip_prefix(':') else {
                continue;
            };
            if let Some(value) = form::text(until_next_label(value).trim()) {
                return Some(value);
            }
        }
    }
    None
}

/// "Macho  Estado: Castrado" -> "Macho"
fn until_next_label(value: &str) -> &str {
    let Some(colon) = value.find(':') else {
        return value;
    };
    let head = &value[..colon];
    let cut = head.rfind(char::is_whitespace).unwrap_or(0);
    let word = head[cut..].trim();
    if !word.is_empty() && word.chars().all(char::is_alphabetic) {
        &value[..cut]
    } else {
        value
    }
}

fn first_word(value: &str) -> Option<String> {
    value
        .split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .and_then(form::text)
}

fn split_items(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c == ';')
        .filter_map(|item| form::text(item.trim()))
        .collect()
}

/// First number written with one of `units`, attached ("38,5ºC") or not ("12 kg").
fn number_with_unit(text: &str, units: &[&str]) -> Option<f64> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            word.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ')'))
                .to_lowercase()
        })
        .collect();

    for (i, word) in words.iter().enumerate() {
        for unit in units {
            let Some(prefix) = word.strip_suffix(unit) else {
                continue;
            };
            let value = if prefix.is_empty() {
                i.checked_sub(1).and_then(|prev| form::number(&words[prev]))
            } else {
                form::number(prefix)
            };
            if value.is_some() {
                return value;
            }
        }
    }
    None
}

/// Day-first dates become ISO dates; anything else is kept as written.
fn normalize_date(raw: &str) -> String {
    ["%d/%m/%y", "%d/%m/%Y", "%d-%m-%y", "%d-%m-%Y", "%Y-%m-%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vet_records_core::config::CoreConfig;

    const HISTORY: &str = "Clínica Veterinaria Sur
Dirección: Calle Mayor 12, Madrid
Teléfono: 912 345 678

Paciente: Toby
Especie: Perro   Raza: Labrador Retriever
Sexo: Macho  Estado: Castrado
Fecha de nacimiento: 03/04/2018
Chip: 941000024681357
Pelo: Corto  Capa: Dorada

Fecha: 02/05/2023
Motivo: Vómitos desde hace dos días
Exploración: Peso 12,4 kg, temperatura 38,9 ºC, 110 lpm
Diagnóstico: Gastritis aguda; deshidratación leve
Tratamiento: Maropitant, Omeprazol
";

    const TWO_VISITS: &str = "Clínica Veterinaria Sur
Teléfono: 912 345 678

Paciente: Luna
Especie: Gata

= 08/12/19 - 16:12
Motivo: Otitis recurrente
Exploración: 4,1 kg, 38,6 ºC
Diagnóstico:
- Otitis externa bilateral
Tratamiento:
- Otomax 5 gotas cada 12 h
- Meloxicam 0,1 mg/kg
Coprológico: negativo

VISITA DE CONTROL DEL DIA 20/12/2019
Acude a consulta por revisión de oídos.
Ecografía abdominal: sin alteraciones
Analítica
ALT 45 U/L
Plan: alta
";

    #[test]
    fn test_parse_record_output() {
        let output = r#"{"pet_info":{"name":"Luna","species":"Feline"},"visits":[{"diagnosis":["Otitis"]}]}"#;

        let record = parse_record_output(output).unwrap();
        assert_eq!(record.pet_info.as_ref().unwrap().name.as_deref(), Some("Luna"));
        assert_eq!(record.visit(0).unwrap().diagnosis(), ["Otitis"]);
    }

    #[test]
    fn test_parse_record_output_with_prose() {
        let output = r#"Here is the extracted record:
{"veterinary_info":{"clinic_name":"Clínica Norte"}}
Let me know if you need anything else."#;

        let record = parse_record_output(output).unwrap();
        assert_eq!(
            record.veterinary_info.as_ref().unwrap().clinic_name.as_deref(),
            Some("Clínica Norte")
        );
    }

    #[test]
    fn test_parse_record_output_errors() {
        assert!(matches!(
            parse_record_output("no record here"),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_record_output("} backwards {"),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_record_output(r#"{"visits": 3}"#),
            Err(ExtractionError::JsonParse(_))
        ));
    }

    #[test]
    fn test_mock_extractor_pet_info() {
        let record = MockExtractor::extract(HISTORY);
        let pet = record.pet_info.as_ref().unwrap();

        assert_eq!(pet.name.as_deref(), Some("Toby"));
        assert_eq!(pet.species.as_deref(), Some("Canine"));
        assert_eq!(pet.breed.as_deref(), Some("Labrador Retriever"));
        assert_eq!(pet.sex.as_deref(), Some("Macho"));
        assert_eq!(pet.reproductive_status.as_deref(), Some("Castrado"));
        assert_eq!(pet.birth_date.as_deref(), Some("2018-04-03"));
        assert_eq!(pet.microchip.as_deref(), Some("941000024681357"));
        assert_eq!(pet.hair_type.as_deref(), Some("Corto"));
        assert_eq!(pet.coat_color.as_deref(), Some("Dorada"));
    }

    #[test]
    fn test_mock_extractor_clinic() {
        let record = MockExtractor::extract(HISTORY);
        let clinic = record.veterinary_info.as_ref().unwrap();

        assert_eq!(clinic.clinic_name.as_deref(), Some("Clínica Veterinaria Sur"));
        assert_eq!(clinic.clinic_address.as_deref(), Some("Calle Mayor 12, Madrid"));
        assert_eq!(clinic.clinic_phone.as_deref(), Some("912 345 678"));
    }

    #[test]
    fn test_mock_extractor_visit() {
        let record = MockExtractor::extract(HISTORY);
        assert_eq!(record.visit_count(), 1);
        let visit = record.visit(0).unwrap();

        assert_eq!(visit.visit_date.as_deref(), Some("2023-05-02"));
        assert_eq!(visit.reason.as_deref(), Some("Vómitos desde hace dos días"));
        assert_eq!(visit.diagnosis(), ["Gastritis aguda", "deshidratación leve"]);
        assert_eq!(visit.treatment().len(), 2);
        assert_eq!(visit.treatment()[1].name, "Omeprazol");

        let exam = visit.physical_examination.as_ref().unwrap();
        assert_eq!(exam.weight, Some(12.4));
        assert_eq!(exam.temperature, Some(38.9));
        assert_eq!(exam.heart_rate, Some(110.0));
        assert_eq!(exam.respiratory_rate, None);
    }

    #[test]
    fn test_mock_extractor_splits_visits_at_headers() {
        let record = MockExtractor::extract(TWO_VISITS);
        assert_eq!(record.visit_count(), 2);
        assert_eq!(
            record.pet_info.as_ref().unwrap().species.as_deref(),
            Some("Feline")
        );

        let first = record.visit(0).unwrap();
        assert_eq!(first.visit_date.as_deref(), Some("2019-12-08"));
        assert_eq!(first.reason.as_deref(), Some("Otitis recurrente"));
        assert_eq!(first.diagnosis(), ["Otitis externa bilateral"]);
        let names: Vec<&str> = first.treatment().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Otomax 5 gotas cada 12 h", "Meloxicam 0,1 mg/kg"]);
        let exam = first.physical_examination.as_ref().unwrap();
        assert_eq!(exam.weight, Some(4.1));
        assert_eq!(exam.temperature, Some(38.6));
        assert_eq!(first.laboratory_tests().len(), 1);
        assert_eq!(first.laboratory_tests()[0].test_name, "Coprológico");
        assert_eq!(
            first.laboratory_tests()[0].results,
            Some(LabResults::Text("negativo".into()))
        );

        let second = record.visit(1).unwrap();
        assert_eq!(second.visit_date.as_deref(), Some("2019-12-20"));
        assert_eq!(second.reason.as_deref(), Some("revisión de oídos"));
        assert_eq!(second.plan.as_deref(), Some("alta"));
        assert!(second.physical_examination.is_none());
        assert!(second.treatment().is_empty());
        let tests: Vec<(&str, Option<&LabResults>)> = second
            .laboratory_tests()
            .iter()
            .map(|t| (t.test_name.as_str(), t.results.as_ref()))
            .collect();
        assert_eq!(
            tests,
            [
                (
                    "Ecografía abdominal",
                    Some(&LabResults::Text("sin alteraciones".into()))
                ),
                ("Analítica", Some(&LabResults::Text("ALT 45 U/L".into()))),
            ]
        );
    }

    #[test]
    fn test_mock_extractor_numbered_visits() {
        let text = "Paciente: Kira
Visita 1
Fecha: 02/03/2021
Motivo: Vacunación anual
Visita 2
Fecha: 10/03/2021
Motivo: Cojera
Radiografía: fisura en radio
";
        let record = MockExtractor::extract(text);
        assert_eq!(record.pet_info.as_ref().unwrap().name.as_deref(), Some("Kira"));
        assert_eq!(record.visit_count(), 2);

        let first = record.visit(0).unwrap();
        assert_eq!(first.visit_date.as_deref(), Some("2021-03-02"));
        assert_eq!(first.reason.as_deref(), Some("Vacunación anual"));
        assert!(first.laboratory_tests().is_empty());

        let second = record.visit(1).unwrap();
        assert_eq!(second.visit_date.as_deref(), Some("2021-03-10"));
        assert_eq!(second.laboratory_tests()[0].test_name, "Radiografía");
    }

    #[test]
    fn test_visit_header() {
        assert_eq!(
            visit_header("= 08/12/19 - 16:12"),
            Some(Some("2019-12-08".to_string()))
        );
        assert_eq!(
            visit_header("VISITA DEL DÍA 08/12/2019"),
            Some(Some("2019-12-08".to_string()))
        );
        assert_eq!(visit_header("Visita 2"), Some(None));
        assert_eq!(visit_header("Consulta 3:"), Some(None));
        assert_eq!(visit_header("Consulta por: vómitos"), None);
        assert_eq!(visit_header("Visita de seguimiento"), None);
        assert_eq!(visit_header("- Meloxicam 0,1 mg/kg"), None);
        assert_eq!(visit_header("----------"), None);
    }

    #[test]
    fn test_labels_start_at_word_boundary() {
        let record =
            MockExtractor::extract("Hotel: Las Palmeras\nSubtipo: B\nTipo de visita: Urgencia\n");
        assert!(record.pet_info.is_none());
        assert!(record.veterinary_info.is_none());
        assert_eq!(record.visit(0).unwrap().visit_type.as_deref(), Some("Urgencia"));

        assert_eq!(find_word("Hotel: 1", "Tel"), None);
        assert_eq!(find_word("Tel: 1", "tel"), Some(0));
        assert_eq!(find_word("Nº tel: 1", "Tel"), Some(4));
        assert_eq!(labeled_value("Microchip: 123", &["Chip"]), None);
    }

    #[test]
    fn test_mock_extractor_species_keyword() {
        let record = MockExtractor::extract("Luna es una gata de 3 años");
        assert_eq!(
            record.pet_info.as_ref().unwrap().species.as_deref(),
            Some("Feline")
        );
    }

    #[test]
    fn test_mock_extractor_empty_text() {
        assert_eq!(MockExtractor::extract(""), MedicalRecord::empty());
    }

    #[test]
    fn test_mock_ingestor_text_upload() {
        let upload = UploadRequest::new(
            "historia.txt".into(),
            HISTORY.as_bytes().to_vec(),
            &CoreConfig::default(),
        )
        .unwrap();

        let document = MockIngestor.ingest(&upload).unwrap();
        assert_eq!(document.file_type, "txt");
        assert_eq!(document.file_size, HISTORY.len() as u64);
        assert_eq!(document.extracted_text.as_deref(), Some(HISTORY));
        assert_eq!(
            document.medical_record.unwrap().pet_info.as_ref().unwrap().name.as_deref(),
            Some("Toby")
        );
    }

    #[test]
    fn test_mock_ingestor_binary_upload() {
        let upload =
            UploadRequest::new("scan.png".into(), vec![0x89, 0x50], &CoreConfig::default())
                .unwrap();

        let document = MockIngestor.ingest(&upload).unwrap();
        assert_eq!(document.file_type, "png");
        assert!(document.extracted_text.is_none());
        assert!(document.medical_record.is_none());
    }

    #[test]
    fn test_mock_ingestor_rejects_invalid_utf8() {
        let upload =
            UploadRequest::new("bad.txt".into(), vec![0xff, 0xfe], &CoreConfig::default())
                .unwrap();

        assert!(matches!(
            MockIngestor.ingest(&upload),
            Err(IngestError::Extraction(_))
        ));
    }

    #[test]
    fn test_until_next_label() {
        assert_eq!(until_next_label("Macho  Estado: Castrado"), "Macho ");
        assert_eq!(until_next_label("Revisión a las 16:30"), "Revisión a las 16:30");
        assert_eq!(until_next_label("Labrador"), "Labrador");
    }

    #[test]
    fn test_number_with_unit() {
        assert_eq!(number_with_unit("Peso: 4.2kg", &["kg"]), Some(4.2));
        assert_eq!(number_with_unit("T 38,5 ºC.", &["ºc"]), Some(38.5));
        assert_eq!(number_with_unit("1 mg/kg", &["kg"]), None);
        assert_eq!(number_with_unit("kg", &["kg"]), None);
    }

    proptest::proptest! {
        #[test]
        fn extraction_never_panics(text in "\\PC{0,200}") {
            let _ = MockExtractor::extract(&text);
            let _ = parse_record_output(&text);
        }

        #[test]
        fn labeled_lines_are_found(name in "[A-Z][a-z]{1,10}", prefix in "[a-z ]{0,20}") {
            let text = format!("{}\nPaciente: {}\n", prefix, name);
            let record = MockExtractor::extract(&text);
            let found = record.pet_info.as_ref().and_then(|pet| pet.name.clone());
            proptest::prop_assert_eq!(found, Some(name));
        }

        #[test]
        fn numbered_headers_split_visits(reasons in proptest::collection::vec("[a-z]{3,10}", 1..5)) {
            let text: String = reasons
                .iter()
                .enumerate()
                .map(|(i, reason)| format!("Visita {}\nMotivo: {}\n", i + 1, reason))
                .collect();
            let record = MockExtractor::extract(&text);
            let found: Vec<Option<String>> =
                record.visits().iter().map(|visit| visit.reason.clone()).collect();
            let expected: Vec<Option<String>> = reasons.into_iter().map(Some).collect();
            proptest::prop_assert_eq!(found, expected);
        }
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("08/12/2019"), "2019-12-08");
        assert_eq!(normalize_date("2019-12-08"), "2019-12-08");
        assert_eq!(normalize_date("08-12-19"), "2019-12-08");
        assert_eq!(normalize_date("ayer"), "ayer");
    }
}
