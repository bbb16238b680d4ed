//! A single named telemetry value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The scalar type of a reading, fixed when the reading is first created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadingKind {
    Bool,
    Int,
    Float,
    String,
}

impl ReadingKind {
    /// Short label used in the table view.
    pub fn label(&self) -> &'static str {
        match self {
            ReadingKind::Bool => "bool",
            ReadingKind::Int => "int",
            ReadingKind::Float => "float",
            ReadingKind::String => "text",
        }
    }

    /// Numeric kinds are rendered right-aligned.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ReadingKind::Int | ReadingKind::Float)
    }
}

/// The value of a reading.
///
/// Widths match what the sensor daemon writes: 32-bit integers and
/// single-precision floats. Integers outside `i32` fall through to `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(String),
}

impl ReadingValue {
    /// The kind this value naturally belongs to.
    pub fn kind(&self) -> ReadingKind {
        match self {
            ReadingValue::Bool(_) => ReadingKind::Bool,
            ReadingValue::Int(_) => ReadingKind::Int,
            ReadingValue::Float(_) => ReadingKind::Float,
            ReadingValue::Text(_) => ReadingKind::String,
        }
    }

    /// Convert this value into `kind` if that can be done without loss.
    ///
    /// Identity conversions always succeed, integers widen to floats, and
    /// anything can be shown as text. Everything else is refused.
    pub fn coerce_to(self, kind: ReadingKind) -> Option<ReadingValue> {
        match (self, kind) {
            (v, k) if v.kind() == k => Some(v),
            (ReadingValue::Int(i), ReadingKind::Float) => Some(ReadingValue::Float(i as f32)),
            (v, ReadingKind::String) => Some(ReadingValue::Text(v.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Bool(b) => write!(f, "{}", b),
            ReadingValue::Int(i) => write!(f, "{}", i),
            ReadingValue::Float(x) => write!(f, "{}", x),
            ReadingValue::Text(s) => f.write_str(s),
        }
    }
}

/// One named scalar telemetry value.
///
/// `kind` is set from the value at construction and never changes afterwards;
/// [`Reading::set_value`] only accepts values that fit the existing kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    name: String,
    kind: ReadingKind,
    value: ReadingValue,
}

impl Reading {
    /// Create a reading whose kind is taken from `value`.
    pub fn new(name: impl Into<String>, value: ReadingValue) -> Self {
        Self {
            name: name.into(),
            kind: value.kind(),
            value,
        }
    }

    /// The reading's name. Empty when the source line carried only a value.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ReadingKind {
        self.kind
    }

    pub fn value(&self) -> &ReadingValue {
        &self.value
    }

    /// Replace the value, keeping the kind.
    ///
    /// Returns `false` (and leaves the old value in place) if `value` cannot
    /// be represented as this reading's kind.
    pub fn set_value(&mut self, value: ReadingValue) -> bool {
        match value.coerce_to(self.kind) {
            Some(v) => {
                self.value = v;
                true
            }
            None => false,
        }
    }
}
