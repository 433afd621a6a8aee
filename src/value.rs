//! Attribute value model
//!
//! `Value` is the dynamic bridge between typed entities and the index
//! machinery: entities expose their indexed attributes as `Value`s, and the
//! encoder / key deriver consume them without knowing the concrete type.

use serde::{Deserialize, Serialize};

/// A single attribute value as seen by the index machinery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent / unset
    Null,

    /// Boolean flag
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Floating point number
    Float(f64),

    /// UTF-8 string
    Str(String),

    /// Multi-valued attribute; indexes fan out over each element
    List(Vec<Value>),
}

impl Value {
    /// Short kind name, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view for score encoding; `None` for non-numeric kinds
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Deterministic rendering used inside composite index keys.
    ///
    /// Must be identical on the write and read paths, or entries become
    /// unreachable. Booleans render as `"1"` / `""` and nulls as `""`;
    /// `false` and null share a key fragment on purpose.
    pub fn key_fragment(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => String::new(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::key_fragment)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl From<&[&str]> for Value {
    fn from(v: &[&str]) -> Self {
        Value::List(v.iter().map(|s| Value::from(*s)).collect())
    }
}

impl From<&Vec<String>> for Value {
    fn from(v: &Vec<String>) -> Self {
        Value::List(v.iter().map(|s| Value::Str(s.clone())).collect())
    }
}
