//! Scalar value normalization.

use crate::types::Value;

/// Render a cell as metadata text.
///
/// Text is returned unchanged. Any other value is rendered with [`Value::to_text`] and a
/// trailing zero fraction (`.0`, `.000`, ...) is stripped, so whole numbers that were widened to
/// float come out as integers. Only a fraction at the very end of the rendered string is
/// affected.
///
/// ```rust
/// use spreadsheet_metadata::processing::normalize;
/// use spreadsheet_metadata::types::Value;
///
/// assert_eq!(normalize(&Value::Text("abc".into())), "abc");
/// assert_eq!(normalize(&Value::Float(5.0)), "5");
/// assert_eq!(normalize(&Value::Float(5.25)), "5.25");
/// ```
pub fn normalize(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        other => strip_zero_fraction(&other.to_text()).to_owned(),
    }
}

/// Strip a trailing `.` followed by one or more `0`s from the end of `text`.
pub fn strip_zero_fraction(text: &str) -> &str {
    match text.rfind('.') {
        Some(dot) => {
            let fraction = &text[dot + 1..];
            if !fraction.is_empty() && fraction.bytes().all(|b| b == b'0') {
                &text[..dot]
            } else {
                text
            }
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{normalize, strip_zero_fraction};
    use crate::types::Value;

    #[test]
    fn text_is_returned_unchanged() {
        assert_eq!(normalize(&Value::Text("abc".into())), "abc");
        assert_eq!(normalize(&Value::Text("5.0".into())), "5.0");
    }

    #[test]
    fn whole_floats_lose_their_fraction() {
        assert_eq!(normalize(&Value::Float(5.0)), "5");
        assert_eq!(normalize(&Value::Float(100.000)), "100");
        assert_eq!(normalize(&Value::Float(-2.0)), "-2");
    }

    #[test]
    fn real_fractions_are_kept() {
        assert_eq!(normalize(&Value::Float(5.25)), "5.25");
        assert_eq!(normalize(&Value::Float(0.5)), "0.5");
    }

    #[test]
    fn other_tags_render_as_text() {
        assert_eq!(normalize(&Value::Int(42)), "42");
        assert_eq!(normalize(&Value::Bool(false)), "False");
        assert_eq!(normalize(&Value::Missing), "");
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(normalize(&Value::DateTime(dt)), "2024-01-15 00:00:00");
    }

    #[test]
    fn only_a_trailing_zero_fraction_is_stripped() {
        assert_eq!(strip_zero_fraction("100.000"), "100");
        assert_eq!(strip_zero_fraction("1.05"), "1.05");
        assert_eq!(strip_zero_fraction("1.0.5"), "1.0.5");
        assert_eq!(strip_zero_fraction("7."), "7.");
        assert_eq!(strip_zero_fraction("700"), "700");
    }
}
