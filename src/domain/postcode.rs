//! Canonical postal code input.
//!
//! Request bodies carry the code as a loosely typed JSON value: clients send
//! `"3000"` as often as `3000`. [`Postcode`] normalises those values into the
//! string form stored in the code list before anything reaches the cache.

use serde_json::Value;
use std::fmt;

/// Errors raised when a value cannot be turned into a [`Postcode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("code is required")]
    Missing,

    #[error("code must be a string, number or boolean, got {0}")]
    UnsupportedType(&'static str),
}

/// A postal code in canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Postcode(String);

impl Postcode {
    /// Wraps an already canonical string.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Postcode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Postcode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<u32> for Postcode {
    fn from(code: u32) -> Self {
        Self(code.to_string())
    }
}

/// Converts a JSON value into its canonical string form.
///
/// # Rules
///
/// - Strings are used verbatim (no trimming, no case folding)
/// - Integers are rendered as decimal digits
/// - Floats without a fractional part are rendered as integers (`3000.0` → `"3000"`)
/// - Booleans become `"true"` / `"false"`
///
/// # Errors
///
/// Returns [`InvalidInput::Missing`] for `null` and
/// [`InvalidInput::UnsupportedType`] for arrays and objects.
impl TryFrom<&Value> for Postcode {
    type Error = InvalidInput;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self(s.clone())),
            Value::Number(n) => Ok(Self(canonical_number(n))),
            Value::Bool(b) => Ok(Self(b.to_string())),
            Value::Null => Err(InvalidInput::Missing),
            Value::Array(_) => Err(InvalidInput::UnsupportedType("array")),
            Value::Object(_) => Err(InvalidInput::UnsupportedType("object")),
        }
    }
}

impl TryFrom<Option<&Value>> for Postcode {
    type Error = InvalidInput;

    fn try_from(value: Option<&Value>) -> Result<Self, Self::Error> {
        value.ok_or(InvalidInput::Missing).and_then(Postcode::try_from)
    }
}

fn canonical_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }

    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}
