//! Conversions between form inputs and record values.
//!
//! An empty input and an absent value are the same thing: clearing a field
//! stores absence, and absence renders as an empty input.

/// Text input to a text field value.
pub fn text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Stored text value with an empty string folded into absence.
pub fn clear_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Text input to a numeric field value.
///
/// Empty, non-numeric, NaN and infinite input all become absence.
/// A decimal comma is accepted ("38,5").
pub fn number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = match trimmed.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) if trimmed.matches(',').count() == 1 => trimmed.replace(',', ".").parse().ok(),
        Err(_) => None,
    };
    parsed.filter(|value| value.is_finite())
}

/// Render a text value for an input.
pub fn display_text(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

/// Render a numeric value for an input.
pub fn display_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text() {
        assert_eq!(text(""), None);
        assert_eq!(text("Rex"), Some("Rex".to_string()));
        assert_eq!(text(" "), Some(" ".to_string()));
    }

    #[test]
    fn test_clear_empty() {
        assert_eq!(clear_empty(Some(String::new())), None);
        assert_eq!(clear_empty(None), None);
        assert_eq!(clear_empty(Some("Rex".into())), Some("Rex".into()));
    }

    #[test]
    fn test_number() {
        assert_eq!(number("38.5"), Some(38.5));
        assert_eq!(number(" 12 "), Some(12.0));
        assert_eq!(number("38,5"), Some(38.5));
        assert_eq!(number(""), None);
        assert_eq!(number("abc"), None);
        assert_eq!(number("1,2,3"), None);
        assert_eq!(number("NaN"), None);
        assert_eq!(number("inf"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(display_text(None), "");
        assert_eq!(display_text(Some("Rex")), "Rex");
        assert_eq!(display_number(None), "");
        assert_eq!(display_number(Some(38.5)), "38.5");
        assert_eq!(display_number(Some(25.0)), "25");
    }
}
