//! Cell values held by a [`DataFrame`](super::DataFrame)

use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::na::NA;

/// A single cell
///
/// Raw tables hold `Text` and `NA` only; the coercion stage turns designated
/// columns into `Int`/`Float`, with unparseable text becoming `NA`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer number
    Int(i64),
    /// Floating point number, always finite
    Float(f64),
    /// Uninterpreted text
    Text(String),
    /// Missing value
    NA,
}

impl Value {
    /// Build a cell from raw scraped text; blank cells are missing
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Value::NA
        } else {
            Value::Text(trimmed.to_string())
        }
    }

    /// Parse text as a number
    ///
    /// Integers are tried first, then floats. Anything else (`"-"`, `"DNB"`,
    /// `""`, `"183*"`, non-finite floats) becomes [`Value::NA`].
    pub fn parse_number(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::NA,
        }
    }

    /// Coerce this cell to a number, see [`Value::parse_number`]
    pub fn to_numeric(&self) -> Self {
        match self {
            Value::Int(_) | Value::Float(_) | Value::NA => self.clone(),
            Value::Text(s) => Value::parse_number(s),
        }
    }

    /// Check whether the cell is missing
    pub fn is_na(&self) -> bool {
        matches!(self, Value::NA)
    }

    /// Check whether the cell is a number
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of the cell; text and NA are missing
    pub fn as_f64(&self) -> NA<f64> {
        match self {
            Value::Int(i) => NA::Value(*i as f64),
            Value::Float(f) => NA::Value(*f),
            Value::Text(_) | Value::NA => NA::NA,
        }
    }

    /// Numeric reading used for ordering
    ///
    /// Numbers read as themselves. Text reads as the number it spells, with a
    /// trailing not-out marker ignored (`"183*"` reads as 183). `"5/20"`,
    /// other text and NA have no reading.
    pub fn numeric_reading(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => {
                let digits = s.trim().strip_suffix('*').unwrap_or(s.trim());
                Value::parse_number(digits).as_f64().into()
            }
            Value::NA => None,
        }
    }

    /// Text view of the cell, used for keys; NA has no key
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::NA => None,
            Value::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Order two cells by [`Value::numeric_reading`]; `None` if either has
    /// no reading
    pub fn numeric_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            _ => self.numeric_reading()?.partial_cmp(&other.numeric_reading()?),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::NA
    }
}

/// Missing values print as an empty string so they round-trip through CSV
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::NA => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        if f.is_finite() {
            Value::Float(f)
        } else {
            Value::NA
        }
    }
}

impl<T: Into<Value>> From<NA<T>> for Value {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => v.into(),
            NA::NA => Value::NA,
        }
    }
}
