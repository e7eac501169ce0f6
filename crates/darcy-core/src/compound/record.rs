//! Record parameters
//!
//! A record is one line: a leading tag token (echoed verbatim on write)
//! followed by component values, consumed left-to-right by each declared
//! component's field width.

use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;

use darcy_schema::RecordSpec;

use crate::compound::{group_tokens, parse_group, resolved_width};
use crate::error::{Error, Result};
use crate::param::Param;
use crate::resolve::LoadContext;
use crate::stream::{words, LineStream};

const PAD: &str = "  ";

/// A loaded record parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    name: String,
    components: IndexMap<String, Param>,
}

impl Record {
    /// Load a record from its line.
    ///
    /// The line is taken as-is (no blank skipping): a record handed a
    /// blank line is an error.
    pub fn load(
        stream: &mut LineStream<'_>,
        spec: &RecordSpec,
        ctx: &LoadContext<'_>,
    ) -> Result<Self> {
        let line = stream
            .advance()
            .ok_or_else(|| Error::Eof("record".to_string()))?;
        let tokens = words(line);
        if tokens.is_empty() {
            return Err(Error::EmptyRecord);
        }
        Self::parse_group(&tokens, spec, ctx)
    }

    /// Parse a record from a token group: tag token first, then component
    /// groups.
    pub fn parse_group(tokens: &[&str], spec: &RecordSpec, ctx: &LoadContext<'_>) -> Result<Self> {
        let Some((tag, rest)) = tokens.split_first() else {
            return Err(Error::EmptyRecord);
        };
        let components = Self::parse_components(rest, spec, ctx)?;
        Ok(Self {
            name: tag.to_lowercase(),
            components,
        })
    }

    fn parse_components(
        tokens: &[&str],
        spec: &RecordSpec,
        ctx: &LoadContext<'_>,
    ) -> Result<IndexMap<String, Param>> {
        let mut components = IndexMap::new();
        let mut rest = tokens;
        for comp in &spec.components {
            if rest.is_empty() && comp.optional {
                continue;
            }
            let take = match resolved_width(comp, ctx)? {
                Some(width) => {
                    if rest.len() < width {
                        return Err(Error::Eof(format!("record component {}", comp.name)));
                    }
                    width
                }
                None => rest.len(),
            };
            let (head, tail) = rest.split_at(take);
            components.insert(comp.name.clone(), parse_group(comp, head, ctx)?);
            rest = tail;
        }
        if let Some(extra) = rest.first() {
            return Err(Error::bad_token(*extra, "end of record".to_string()));
        }
        Ok(components)
    }

    /// Record tag (lowercase).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a component by name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.components.get(name)
    }

    /// Component names and values, in schema order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.components.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Token form of the record: uppercase tag, then component tokens.
    pub(crate) fn group_tokens(&self) -> Result<Vec<String>> {
        let mut out = vec![self.name.to_uppercase()];
        for param in self.components.values() {
            out.extend(group_tokens(param)?);
        }
        Ok(out)
    }

    /// Write the record as one line, space-separated, newline after the
    /// last component.
    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        writeln!(w, "{PAD}{}", self.group_tokens()?.join(" "))?;
        Ok(())
    }
}
