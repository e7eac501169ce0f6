//! Scalar values
//!
//! [`Value`] is the single scalar currency of the engine: parameter
//! defaults, loaded scalar parameters, generic list cells, and resolver
//! leaves all carry it.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A scalar input value.
///
/// `Keyword` carries presence semantics: a keyword parameter that appears in
/// a block has the value `Keyword(true)`; an absent or cleared keyword is
/// `Keyword(false)` and is not written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Keyword presence flag
    Keyword(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Double(f64),
    /// Single-token string
    Word(String),
    /// Free text (rest of line)
    Text(String),
    /// File path, relative to the owning stream's directory
    Path(PathBuf),
    /// Multi-token cell (jagged list columns)
    Seq(Vec<Value>),
}

impl Value {
    /// Get the keyword flag, if this is a keyword.
    pub fn as_keyword(&self) -> Option<bool> {
        match self {
            Value::Keyword(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a double. Integers coerce.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the string content, if this is a word or text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Word(s) | Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the path, if this is a path value.
    pub fn as_path(&self) -> Option<&PathBuf> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Check whether the value is set for writing purposes.
    ///
    /// `Keyword(false)` is the only unset-but-present value.
    pub fn is_set(&self) -> bool {
        !matches!(self, Value::Keyword(false))
    }
}

/// Format a double the way input files carry them: a bare integral value
/// keeps one decimal digit (`100.0`), everything else uses the shortest
/// round-trip form.
pub fn format_double(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Keyword(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{}", format_double(*d)),
            Value::Word(s) | Value::Text(s) => write!(f, "{s}"),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::Seq(vs) => {
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
        }
    }
}
