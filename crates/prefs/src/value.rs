// Primitive values a preference can hold

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored preference value.
///
/// Serialized untagged so the JSON namespace file stays a flat
/// `{"key": primitive}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Discriminant used by backends that store the type next to the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefKind {
    Bool,
    String,
    Int,
    Float,
}

impl PrefKind {
    /// Stable integer code (SQLite `kind` column)
    pub fn code(self) -> i64 {
        match self {
            PrefKind::Bool => 0,
            PrefKind::String => 1,
            PrefKind::Int => 2,
            PrefKind::Float => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PrefKind::Bool),
            1 => Some(PrefKind::String),
            2 => Some(PrefKind::Int),
            3 => Some(PrefKind::Float),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrefKind::Bool => "bool",
            PrefKind::String => "string",
            PrefKind::Int => "int",
            PrefKind::Float => "float",
        }
    }
}

impl PrefValue {
    pub fn kind(&self) -> PrefKind {
        match self {
            PrefValue::Bool(_) => PrefKind::Bool,
            PrefValue::Int(_) => PrefKind::Int,
            PrefValue::Float(_) => PrefKind::Float,
            PrefValue::String(_) => PrefKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PrefValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers widen to floats; nothing else converts.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PrefValue::Float(n) => Some(*n),
            PrefValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Text form used by the SQLite backend's `value` column.
    pub fn to_text(&self) -> String {
        match self {
            PrefValue::Bool(b) => b.to_string(),
            PrefValue::Int(n) => n.to_string(),
            PrefValue::Float(n) => n.to_string(),
            PrefValue::String(s) => s.clone(),
        }
    }

    /// Parse `text` as a value of `kind`. Returns None if it doesn't fit.
    pub fn parse(kind: PrefKind, text: &str) -> Option<Self> {
        match kind {
            PrefKind::Bool => match text {
                "true" => Some(PrefValue::Bool(true)),
                "false" => Some(PrefValue::Bool(false)),
                _ => None,
            },
            PrefKind::Int => text.parse().ok().map(PrefValue::Int),
            PrefKind::Float => text.parse().ok().map(PrefValue::Float),
            PrefKind::String => Some(PrefValue::String(text.to_string())),
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<bool> for PrefValue {
    fn from(b: bool) -> Self {
        PrefValue::Bool(b)
    }
}

impl From<i64> for PrefValue {
    fn from(n: i64) -> Self {
        PrefValue::Int(n)
    }
}

impl From<f64> for PrefValue {
    fn from(n: f64) -> Self {
        PrefValue::Float(n)
    }
}

impl From<String> for PrefValue {
    fn from(s: String) -> Self {
        PrefValue::String(s)
    }
}

impl From<&str> for PrefValue {
    fn from(s: &str) -> Self {
        PrefValue::String(s.to_string())
    }
}
