//! Keystring (union) parameters
//!
//! A keystring is a union of named components. In a block it spans one
//! line per active key, each line's leading token selecting the component;
//! inside a record it is a single token group. Which keys are present *is*
//! the variant selection — there is no separate discriminant.

use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;

use darcy_schema::{KeystringSpec, Value};

use crate::compound::{group_tokens, parse_group};
use crate::error::{Error, Result};
use crate::param::Param;
use crate::resolve::LoadContext;
use crate::stream::{is_content, words, LineStream};

const PAD: &str = "  ";

/// A loaded keystring parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keystring {
    name: String,
    values: IndexMap<String, Param>,
}

impl Keystring {
    /// Load a keystring from consecutive block lines.
    ///
    /// Reads until an `END` line is peeked (left unconsumed for the block
    /// reader). Each key may appear at most once; a leading token that
    /// names no component is a hard error.
    pub fn load(
        stream: &mut LineStream<'_>,
        name: &str,
        spec: &KeystringSpec,
        ctx: &LoadContext<'_>,
    ) -> Result<Self> {
        let mut values = IndexMap::new();
        loop {
            let pos = stream.pos();
            let Some(line) = stream.advance() else {
                return Err(Error::Eof(format!("keystring {name}")));
            };
            if !is_content(line) {
                continue;
            }
            let tokens = words(line);
            let key = tokens[0].to_lowercase();
            if key == "end" {
                stream.rewind(pos);
                break;
            }
            let Some(comp) = spec.components.get(&key) else {
                return Err(Error::UnknownParam(key.to_uppercase()));
            };
            if values.contains_key(&key) {
                return Err(Error::DuplicateKey(key));
            }
            values.insert(key, parse_group(comp, &tokens[1..], ctx)?);
        }
        Ok(Self {
            name: name.to_lowercase(),
            values,
        })
    }

    /// Parse a single keyed entry from a token group (the record-embedded
    /// form): leading token selects the component, the rest is its value.
    pub fn parse_group(
        name: &str,
        spec: &KeystringSpec,
        tokens: &[&str],
        ctx: &LoadContext<'_>,
    ) -> Result<Self> {
        let Some((head, rest)) = tokens.split_first() else {
            return Err(Error::Eof(format!("keystring {name}")));
        };
        let key = head.to_lowercase();
        let Some(comp) = spec.components.get(&key) else {
            return Err(Error::UnknownParam(key.to_uppercase()));
        };
        let mut values = IndexMap::new();
        values.insert(key, parse_group(comp, rest, ctx)?);
        Ok(Self {
            name: name.to_lowercase(),
            values,
        })
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an active key's value.
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.values.get(key)
    }

    /// Active keys, in load order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of active keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no key is active.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Token form of the (single-entry) keystring, for record embedding.
    pub(crate) fn group_tokens(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        for (key, param) in &self.values {
            out.extend(entry_tokens(key, param)?);
        }
        Ok(out)
    }

    /// Write one line per active key.
    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        for (key, param) in &self.values {
            writeln!(w, "{PAD}{}", entry_tokens(key, param)?.join(" "))?;
        }
        Ok(())
    }
}

/// Tokens for one keyed entry: the key, then the component's value tokens.
/// A bare keyword entry is just its key.
fn entry_tokens(key: &str, param: &Param) -> Result<Vec<String>> {
    if let Param::Scalar(s) = param {
        if matches!(s.value(), Value::Keyword(true)) {
            return Ok(vec![key.to_uppercase()]);
        }
    }
    let mut out = vec![key.to_uppercase()];
    out.extend(group_tokens(param)?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use darcy_schema::{ParamSpec, ShapeExpr};

    fn ocsetting_spec() -> KeystringSpec {
        KeystringSpec::new(vec![
            ParamSpec::keyword("all"),
            ParamSpec::keyword("first"),
            ParamSpec::keyword("last"),
            ParamSpec::int("frequency"),
            ParamSpec::int_array("steps", ShapeExpr::Free),
        ])
    }

    #[test]
    fn test_multi_key_load() {
        let mut stream = LineStream::new("FIRST\nFREQUENCY 2\nEND PERIOD\n");
        let ctx = LoadContext::new(".");
        let ks = Keystring::load(&mut stream, "ocsetting", &ocsetting_spec(), &ctx).unwrap();
        assert_eq!(ks.len(), 2);
        assert_eq!(
            ks.get("first").unwrap().as_scalar().unwrap().value().as_keyword(),
            Some(true)
        );
        assert_eq!(
            ks.get("frequency").unwrap().as_scalar().unwrap().value().as_int(),
            Some(2)
        );
        // END is peeked, not consumed
        assert_eq!(stream.peek(), Some("END PERIOD"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut stream = LineStream::new("FREQUENCY 2\nFREQUENCY 4\nEND PERIOD\n");
        let ctx = LoadContext::new(".");
        let err = Keystring::load(&mut stream, "ocsetting", &ocsetting_spec(), &ctx).unwrap_err();
        match err {
            Error::DuplicateKey(key) => assert_eq!(key, "frequency"),
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut stream = LineStream::new("NEVER 1\nEND PERIOD\n");
        let ctx = LoadContext::new(".");
        let err = Keystring::load(&mut stream, "ocsetting", &ocsetting_spec(), &ctx).unwrap_err();
        assert!(matches!(err, Error::UnknownParam(_)));
    }

    #[test]
    fn test_premature_eof() {
        let mut stream = LineStream::new("FIRST\n");
        let ctx = LoadContext::new(".");
        let err = Keystring::load(&mut stream, "ocsetting", &ocsetting_spec(), &ctx).unwrap_err();
        assert!(matches!(err, Error::Eof(_)));
    }

    #[test]
    fn test_write_one_line_per_key() {
        let mut stream = LineStream::new("FIRST\nSTEPS 1 3 5\nEND PERIOD\n");
        let ctx = LoadContext::new(".");
        let ks = Keystring::load(&mut stream, "ocsetting", &ocsetting_spec(), &ctx).unwrap();
        let mut out = Vec::new();
        ks.write(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "  FIRST\n  STEPS 1 3 5\n");
    }
}
