use std::{cmp::Ordering, fmt::Display, sync::LazyLock};

use regex::Regex;
use serde::{Serialize, Serializer};

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));
static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("valid timestamp pattern")
});

/// Column type tag
///
/// The first seven variants are the tags produced by inference. Types declared
/// in CREATE TABLE or handed in by the host that are not one of them (VARCHAR,
/// FLOAT, ...) are kept verbatim so schemas and exports echo what was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Real,
    Boolean,
    Text,
    Date,
    Timestamp,
    Null,
    Declared(String),
}

impl DataType {
    /// Maps a declared type name onto a tag, keeping unknown names as-is
    pub fn from_declared(name: &str) -> Self {
        match name {
            "INTEGER" => DataType::Integer,
            "REAL" => DataType::Real,
            "BOOLEAN" => DataType::Boolean,
            "TEXT" => DataType::Text,
            "DATE" => DataType::Date,
            "TIMESTAMP" => DataType::Timestamp,
            "NULL" => DataType::Null,
            other => DataType::Declared(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Real => "REAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Text => "TEXT",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Null => "NULL",
            DataType::Declared(name) => name,
        }
    }

    /// Infers the tag of a string cell (DATE, TIMESTAMP or TEXT)
    pub fn infer_text(text: &str) -> Self {
        if DATE_PATTERN.is_match(text) {
            DataType::Date
        } else if TIMESTAMP_PATTERN.is_match(text) {
            DataType::Timestamp
        } else {
            DataType::Text
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Runtime cell value
///
/// Cells are not cast to their column's type: a column declared INTEGER may
/// hold strings, which is how INSERT stores its literals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Returns the inferred type tag of the value
    pub fn infer_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Boolean(_) => DataType::Boolean,
            Value::Integer(_) => DataType::Integer,
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 => DataType::Integer,
            Value::Float(_) => DataType::Real,
            Value::String(s) => DataType::infer_text(s),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric coercion: null is 0, booleans are 0/1, text is parsed
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::String(s) => parse_number(s),
        }
    }

    /// Loose equality against a literal taken from SQL text
    ///
    /// Text compares as text, null never equals a literal, everything else
    /// compares numerically.
    pub fn loose_eq(&self, literal: &str) -> bool {
        match self {
            Value::Null => false,
            Value::String(s) => s == literal,
            other => other.to_number() == parse_number(literal),
        }
    }

    /// Ordering against a literal, None when the numeric side is NaN
    pub fn loose_cmp(&self, literal: &str) -> Option<Ordering> {
        match self {
            Value::String(s) => Some(s.as_str().cmp(literal)),
            other => other.to_number().partial_cmp(&parse_number(literal)),
        }
    }

    /// Text form used for pattern matching (null renders as `null`)
    pub fn to_match_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            nested => Value::String(nested.to_string()),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
        }
    }
}

/// Parses text the way a loose numeric comparison does: blank is 0,
/// anything that is not a plain decimal number is NaN.
fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

/// A row is a vector of values
pub type Row = Vec<Value>;
