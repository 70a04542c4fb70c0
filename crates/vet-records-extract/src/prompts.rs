//! Prompts for structured record extraction.

/// System prompt for record extraction.
pub const SYSTEM_PROMPT: &str = r#"You are a veterinary medical assistant that extracts structured medical records from clinical histories written in Spanish.

Extract:
- pet_info: name, species, breed, birth_date, sex, reproductive_status, weight (kg), microchip, hair_type, coat_color
- veterinary_info: clinic_name, clinic_address, clinic_phone
- visits: one entry per consultation, with visit_date, visit_type, reason, anamnesis, physical_examination, diagnosis, treatment, plan, laboratory_tests, vaccinations and observations

Species words map to English: perro/perra = Canine, gato/gata = Feline.
Leave out any field the text does not mention. Never invent values.

Output a single JSON object."#;

/// User prompt template for record extraction.
pub fn make_extraction_prompt(text: &str) -> String {
    format!(
        r#"Extract the medical record from this veterinary clinical history:

"{}"

Return a JSON object with optional keys "pet_info", "veterinary_info" and "visits". Inside a visit:
- physical_examination: weight, temperature (°C), heart_rate, respiratory_rate as numbers; other findings as strings
- diagnosis: array of strings
- treatment: array of objects with "name" and optional dosage, frequency, duration, route, observations
- laboratory_tests: array of objects with "test_name" and optional test_date, results
- vaccinations: array of objects with "vaccine_name", optional dates and "applied" (true unless only scheduled)"#,
        text
    )
}

/// Build a complete prompt with system context.
pub fn build_full_prompt(text: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("<|system|>\n");
    prompt.push_str(SYSTEM_PROMPT);
    prompt.push_str("\n<|end|>\n");

    prompt.push_str("<|user|>\n");
    prompt.push_str(&make_extraction_prompt(text));
    prompt.push_str("\n<|end|>\n");
    prompt.push_str("<|assistant|>\n");

    prompt
}
