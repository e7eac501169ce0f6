//! Scalar parameters
//!
//! A scalar is a single typed value on its own line: `HCLOSE 0.001`,
//! `BUDGET_FILE out.cbc`, or a bare keyword such as `SAVE_FLOWS` whose
//! presence is the value.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use darcy_schema::{ScalarKind, Value};

use crate::error::{Error, Result};
use crate::stream::{words, LineStream};

const PAD: &str = "  ";

/// A loaded scalar parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scalar {
    name: String,
    kind: ScalarKind,
    value: Value,
}

impl Scalar {
    /// Construct a scalar from an already-typed value.
    pub fn from_value(name: impl Into<String>, kind: ScalarKind, value: Value) -> Self {
        Self {
            name: name.into().to_lowercase(),
            kind,
            value,
        }
    }

    /// Load a scalar from the next content line.
    ///
    /// The line's leading token must be the parameter name; the rest is
    /// parsed according to `kind`.
    pub fn load(stream: &mut LineStream<'_>, name: &str, kind: ScalarKind) -> Result<Self> {
        let (_, line) = stream.expect_content(name)?;
        let tokens = words(line);
        let Some((head, rest)) = tokens.split_first() else {
            return Err(Error::Eof(name.to_string()));
        };
        if !head.eq_ignore_ascii_case(name) {
            return Err(Error::bad_token(*head, format!("parameter {name}")));
        }
        let value = Self::parse_tokens(name, kind, rest)?;
        Ok(Self::from_value(name, kind, value))
    }

    /// Parse a scalar value from its tokens (the name token already
    /// consumed). Shared between line loading and record/keystring group
    /// parsing.
    pub fn parse_tokens(name: &str, kind: ScalarKind, tokens: &[&str]) -> Result<Value> {
        match kind {
            ScalarKind::Keyword => match tokens {
                [] => Ok(Value::Keyword(true)),
                [token] if token.eq_ignore_ascii_case(name) => Ok(Value::Keyword(true)),
                [token, ..] => Err(Error::bad_token(*token, format!("keyword {name}"))),
            },
            ScalarKind::Text => {
                if tokens.is_empty() {
                    return Err(Error::bad_token("", format!("text value for {name}")));
                }
                Ok(Value::Text(tokens.join(" ")))
            }
            _ => {
                let token = single_token(name, kind, tokens)?;
                match kind {
                    ScalarKind::Int => token
                        .parse::<i64>()
                        .map(Value::Int)
                        .map_err(|_| Error::bad_token(token, format!("integer value for {name}"))),
                    ScalarKind::Double => token
                        .parse::<f64>()
                        .map(Value::Double)
                        .map_err(|_| Error::bad_token(token, format!("double value for {name}"))),
                    ScalarKind::Word => Ok(Value::Word(token.to_string())),
                    ScalarKind::Filename => Ok(Value::Path(PathBuf::from(token))),
                    ScalarKind::Keyword | ScalarKind::Text => unreachable!(),
                }
            }
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind.
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Current value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the value.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Write the scalar as one line. An unset keyword writes nothing.
    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        match &self.value {
            Value::Keyword(false) => Ok(()),
            Value::Keyword(true) => {
                writeln!(w, "{PAD}{}", self.name.to_uppercase())?;
                Ok(())
            }
            value => {
                writeln!(w, "{PAD}{} {value}", self.name.to_uppercase())?;
                Ok(())
            }
        }
    }
}

fn single_token<'a>(name: &str, kind: ScalarKind, tokens: &[&'a str]) -> Result<&'a str> {
    match tokens {
        [token] => Ok(token),
        [] => Err(Error::bad_token(
            "",
            format!("{} value for {name}", kind_name(kind)),
        )),
        [_, extra, ..] => Err(Error::bad_token(*extra, format!("end of {name}"))),
    }
}

fn kind_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Keyword => "keyword",
        ScalarKind::Int => "integer",
        ScalarKind::Double => "double",
        ScalarKind::Word => "string",
        ScalarKind::Text => "text",
        ScalarKind::Filename => "filename",
    }
}
