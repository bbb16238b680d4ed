//! Value formatting for display.

use crate::model::ReadingValue;

/// Format a value for the table.
///
/// Floats are shown with at most two decimals and no trailing zeros
/// (`41.0` → `41`, `3.456` → `3.46`). Everything else uses its natural text.
pub fn format_value(value: &ReadingValue) -> String {
    match value {
        ReadingValue::Float(f) => format_float(*f),
        other => other.to_string(),
    }
}

fn format_float(value: f32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float_at_most_two_decimals() {
        assert_eq!(format_value(&ReadingValue::Float(41.0)), "41");
        assert_eq!(format_value(&ReadingValue::Float(3.456)), "3.46");
        assert_eq!(format_value(&ReadingValue::Float(0.5)), "0.5");
        assert_eq!(format_value(&ReadingValue::Float(-0.001)), "0");
        assert_eq!(format_value(&ReadingValue::Float(100.0)), "100");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_value(&ReadingValue::Float(f32::INFINITY)), "inf");
        assert_eq!(format_value(&ReadingValue::Float(f32::NAN)), "NaN");
    }

    #[test]
    fn test_format_other_kinds() {
        assert_eq!(format_value(&ReadingValue::Int(-7)), "-7");
        assert_eq!(format_value(&ReadingValue::Bool(true)), "true");
        assert_eq!(format_value(&ReadingValue::Text("ok".into())), "ok");
    }
}
