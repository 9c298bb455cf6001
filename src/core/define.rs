//! Compile-time define flags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value carried by a define flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefineValue {
    Bool(bool),
    Str(String),
}

impl DefineValue {
    /// Rendering for a preprocessor definition: `1`/`0` or a quoted string.
    pub fn to_preprocessor(&self) -> String {
        match self {
            DefineValue::Bool(true) => "1".to_string(),
            DefineValue::Bool(false) => "0".to_string(),
            DefineValue::Str(s) => format!("\"{}\"", s),
        }
    }

    /// Rendering for a build-cache variable: `ON`/`OFF` or the raw string.
    pub fn to_cache(&self) -> String {
        match self {
            DefineValue::Bool(true) => "ON".to_string(),
            DefineValue::Bool(false) => "OFF".to_string(),
            DefineValue::Str(s) => s.clone(),
        }
    }

    /// CMake cache type for this value.
    pub fn cache_type(&self) -> &'static str {
        match self {
            DefineValue::Bool(_) => "BOOL",
            DefineValue::Str(_) => "STRING",
        }
    }
}

impl From<bool> for DefineValue {
    fn from(value: bool) -> Self {
        DefineValue::Bool(value)
    }
}

impl From<&str> for DefineValue {
    fn from(value: &str) -> Self {
        DefineValue::Str(value.to_string())
    }
}

impl fmt::Display for DefineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefineValue::Bool(b) => write!(f, "{}", b),
            DefineValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A named compile-time symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefineFlag {
    pub name: String,
    pub value: DefineValue,
}

impl DefineFlag {
    pub fn new(name: impl Into<String>, value: impl Into<DefineValue>) -> Self {
        DefineFlag {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Render as a compiler flag: `-DNAME=value`.
    pub fn to_flag(&self) -> String {
        format!("-D{}={}", self.name, self.value.to_preprocessor())
    }
}
