//! Line parser for the telemetry text format.
//!
//! Each non-blank line is `[<name>] <value>`, fields separated by any run
//! of whitespace. The value's type is inferred from its text alone.

use crate::model::{Reading, ReadingValue};

/// Parse one line into a reading.
///
/// Returns `None` for blank or whitespace-only lines. Lines with more than
/// two fields are not rejected: they yield an unnamed, empty text reading.
///
/// Text readings come back holding only their own token; the reader folds
/// them into the feed's running transcript.
pub fn parse_line(line: &str) -> Option<Reading> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let (name, value_text) = match tokens.as_slice() {
        [] => return None,
        [value] => ("", *value),
        [name, value] => (*name, *value),
        _ => ("", ""),
    };

    Some(Reading::new(name, infer_value(value_text)))
}

/// Infer a typed value from text.
///
/// Tried in order, first match wins: boolean literal, integer, float, and
/// finally the text itself. So `"1"` is an integer, never a boolean or float.
pub fn infer_value(text: &str) -> ReadingValue {
    if let Some(b) = parse_bool(text) {
        ReadingValue::Bool(b)
    } else if let Ok(i) = text.parse::<i32>() {
        ReadingValue::Int(i)
    } else if let Ok(f) = text.parse::<f32>() {
        ReadingValue::Float(f)
    } else {
        ReadingValue::Text(text.to_string())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
