//! Compound parameter types
//!
//! - [`Record`] — product type: a fixed, ordered tuple of components read
//!   from one line.
//! - [`Keystring`] — sum type: keyed components selected by each line's
//!   leading token, every key settable at most once.
//! - [`List`] — repeating rows with a schema-derived column layout, stored
//!   column-wise.
//!
//! This module also holds the token-group machinery the three share: a
//! component's *field width* (how many tokens it consumes from a line) and
//! the group parser that turns a token slice into a loaded parameter.

pub mod keystring;
pub mod list;
pub mod record;

pub use keystring::Keystring;
pub use list::List;
pub use record::Record;

use darcy_schema::{ParamKind, ParamSpec, ScalarKind, ShapeExpr, Value};

use crate::array::{Array, Element};
use crate::error::{Error, Result};
use crate::param::Param;
use crate::resolve::LoadContext;
use crate::scalar::Scalar;

/// Number of tokens a component consumes from its line, resolved against
/// the component tree. `None` means the component takes the rest of the
/// group (free-shaped arrays, text, keystrings).
pub(crate) fn resolved_width(spec: &ParamSpec, ctx: &LoadContext<'_>) -> Result<Option<usize>> {
    match &spec.kind {
        ParamKind::Scalar(ScalarKind::Text) => Ok(None),
        ParamKind::Scalar(_) => Ok(Some(1)),
        ParamKind::Array(_) => match &spec.shape {
            ShapeExpr::Scalar => Ok(Some(1)),
            ShapeExpr::Free | ShapeExpr::RowDependent(_) => Ok(None),
            ShapeExpr::Dims(_) => Ok(Some(ctx.resolve_shape(&spec.shape)?.iter().product())),
        },
        ParamKind::Record(rs) => {
            // one token for the record tag, then the component widths
            let mut total = 1;
            for comp in &rs.components {
                match resolved_width(comp, ctx)? {
                    Some(n) => total += n,
                    None => return Ok(None),
                }
            }
            Ok(Some(total))
        }
        ParamKind::Keystring(_) => Ok(None),
        ParamKind::List(_) => Err(Error::UnsupportedComponent(spec.name.clone())),
    }
}

/// Parse one component from its token group.
pub(crate) fn parse_group(
    spec: &ParamSpec,
    tokens: &[&str],
    ctx: &LoadContext<'_>,
) -> Result<Param> {
    match &spec.kind {
        ParamKind::Scalar(kind) => {
            let value = Scalar::parse_tokens(&spec.name, *kind, tokens)?;
            Ok(Param::Scalar(Scalar::from_value(&spec.name, *kind, value)))
        }
        ParamKind::Array(elem) => {
            let shape = match &spec.shape {
                ShapeExpr::Dims(_) => ctx.resolve_shape(&spec.shape)?,
                _ => vec![tokens.len()],
            };
            match elem {
                darcy_schema::ElemType::Int => {
                    Ok(Param::IntArray(parse_array_group(&spec.name, shape, tokens)?))
                }
                darcy_schema::ElemType::Double => Ok(Param::DoubleArray(parse_array_group(
                    &spec.name, shape, tokens,
                )?)),
            }
        }
        ParamKind::Record(rs) => Ok(Param::Record(Record::parse_group(tokens, rs, ctx)?)),
        ParamKind::Keystring(ks) => Ok(Param::Keystring(Keystring::parse_group(
            &spec.name, ks, tokens, ctx,
        )?)),
        ParamKind::List(_) => Err(Error::UnsupportedComponent(spec.name.clone())),
    }
}

fn parse_array_group<T: Element>(name: &str, shape: Vec<usize>, tokens: &[&str]) -> Result<Array<T>> {
    let expected: usize = shape.iter().product();
    if tokens.len() != expected {
        return Err(Error::ShapeMismatch {
            expected,
            got: tokens.len(),
        });
    }
    let mut data = Vec::with_capacity(expected);
    for &token in tokens {
        let v = T::parse(token)
            .ok_or_else(|| Error::bad_token(token, format!("{} value for {name}", T::TYPE_NAME)))?;
        data.push(v);
    }
    Array::from_dense(name, shape, data)
}

/// Emit a component back to its token form, the inverse of
/// [`parse_group`]. Arrays expand to their resolved elements.
pub(crate) fn group_tokens(param: &Param) -> Result<Vec<String>> {
    match param {
        Param::Scalar(s) => Ok(match s.value() {
            Value::Keyword(true) => vec![s.name().to_uppercase()],
            Value::Keyword(false) => Vec::new(),
            value => vec![value.to_string()],
        }),
        Param::IntArray(a) => Ok(a.value()?.iter().map(Element::format).collect()),
        Param::DoubleArray(a) => Ok(a.value()?.iter().map(Element::format).collect()),
        Param::Record(r) => r.group_tokens(),
        Param::Keystring(k) => k.group_tokens(),
        Param::List(l) => Err(Error::UnsupportedComponent(l.name().to_string())),
        Param::Values(v) => Err(Error::UnsupportedComponent(v.name().to_string())),
    }
}
