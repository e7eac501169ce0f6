//! Parameter values and schema dispatch
//!
//! [`Param`] is the closed set of loaded parameter values. The block
//! reader matches a line to a [`ParamSpec`](darcy_schema::ParamSpec) and
//! [`Param::load`] dispatches to the kind's loader; writing walks the same
//! dispatch in reverse.

use std::io::Write;

use serde::Serialize;
use tracing::warn;

use darcy_schema::{ElemType, ParamKind, ParamSpec, Value};

use crate::array::Array;
use crate::compound::{Keystring, List, Record};
use crate::error::Result;
use crate::resolve::LoadContext;
use crate::scalar::Scalar;
use crate::stream::LineStream;

/// Ordered generic column storage for non-numeric list columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueList {
    name: String,
    values: Vec<Value>,
}

impl ValueList {
    /// Construct from an ordered cell list.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            values,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell values in row order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A loaded parameter value.
///
/// One variant per parameter kind; the set is closed so every dispatch
/// over it is compiler-checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Param {
    /// Single typed value
    Scalar(Scalar),
    /// Integer array
    IntArray(Array<i64>),
    /// Double array
    DoubleArray(Array<f64>),
    /// Fixed-arity record
    Record(Record),
    /// Tagged union
    Keystring(Keystring),
    /// Repeating row table
    List(List),
    /// Generic list column storage
    Values(ValueList),
}

impl Param {
    /// Load a parameter of the declared kind from the stream.
    ///
    /// The stream is positioned at the start of the parameter's first
    /// line; block-local context supplies the working directory and the
    /// component tree for shape and bound resolution.
    pub fn load(spec: &ParamSpec, stream: &mut LineStream<'_>, ctx: &LoadContext<'_>) -> Result<Self> {
        match &spec.kind {
            ParamKind::Scalar(kind) => {
                Scalar::load(stream, &spec.name, *kind).map(Param::Scalar)
            }
            ParamKind::Array(ElemType::Int) => {
                let shape = ctx.resolve_shape(&spec.shape)?;
                Array::load(stream, ctx, &spec.name, &shape, spec.layered, true)
                    .map(Param::IntArray)
            }
            ParamKind::Array(ElemType::Double) => {
                let shape = ctx.resolve_shape(&spec.shape)?;
                Array::load(stream, ctx, &spec.name, &shape, spec.layered, true)
                    .map(Param::DoubleArray)
            }
            ParamKind::Record(rs) => Record::load(stream, rs, ctx).map(Param::Record),
            ParamKind::Keystring(ks) => {
                Keystring::load(stream, &spec.name, ks, ctx).map(Param::Keystring)
            }
            ParamKind::List(ls) => List::load(stream, &spec.name, ls, ctx).map(Param::List),
        }
    }

    /// Write the parameter's stored representation.
    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        match self {
            Param::Scalar(s) => s.write(w),
            Param::IntArray(a) => a.write(w),
            Param::DoubleArray(a) => a.write(w),
            Param::Record(r) => r.write(w),
            Param::Keystring(k) => k.write(w),
            Param::List(l) => l.write(w),
            Param::Values(v) => {
                // list column storage has no standalone block form
                warn!(name = %v.name(), "skipping write of bare list column");
                Ok(())
            }
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        match self {
            Param::Scalar(s) => s.name(),
            Param::IntArray(a) => a.name(),
            Param::DoubleArray(a) => a.name(),
            Param::Record(r) => r.name(),
            Param::Keystring(k) => k.name(),
            Param::List(l) => l.name(),
            Param::Values(v) => v.name(),
        }
    }

    /// The scalar, if this is a scalar parameter.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Param::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The integer array, if this is one.
    pub fn as_int_array(&self) -> Option<&Array<i64>> {
        match self {
            Param::IntArray(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable integer array access.
    pub fn as_int_array_mut(&mut self) -> Option<&mut Array<i64>> {
        match self {
            Param::IntArray(a) => Some(a),
            _ => None,
        }
    }

    /// The double array, if this is one.
    pub fn as_double_array(&self) -> Option<&Array<f64>> {
        match self {
            Param::DoubleArray(a) => Some(a),
            _ => None,
        }
    }

    /// Mutable double array access.
    pub fn as_double_array_mut(&mut self) -> Option<&mut Array<f64>> {
        match self {
            Param::DoubleArray(a) => Some(a),
            _ => None,
        }
    }

    /// The record, if this is one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Param::Record(r) => Some(r),
            _ => None,
        }
    }

    /// The keystring, if this is one.
    pub fn as_keystring(&self) -> Option<&Keystring> {
        match self {
            Param::Keystring(k) => Some(k),
            _ => None,
        }
    }

    /// The list, if this is one.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Param::List(l) => Some(l),
            _ => None,
        }
    }

    /// The generic column storage, if this is one.
    pub fn as_values(&self) -> Option<&ValueList> {
        match self {
            Param::Values(v) => Some(v),
            _ => None,
        }
    }

    /// The scalar value, if this is a scalar parameter.
    pub fn value(&self) -> Option<&Value> {
        self.as_scalar().map(Scalar::value)
    }
}
