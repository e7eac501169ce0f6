//! Shape expressions
//!
//! A shape describes how many tokens a parameter occupies: the declared
//! dimensions of an array, or the width of a list column. Dimensions are
//! either literal or named after a value owned by another component and
//! resolved at load time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::KeyPath;

/// One dimension of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dim {
    /// Literal extent
    Fixed(usize),
    /// Extent resolved through the component tree at load time
    Named(KeyPath),
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Fixed(n) => write!(f, "{n}"),
            Dim::Named(p) => write!(f, "{p}"),
        }
    }
}

/// Declared shape of a parameter.
///
/// `Scalar` is the unshaped one-token case. `Free` is the `(:)` shape: one
/// cell whose content runs to the end of the line (or, for an array-typed
/// record component, however many tokens remain). `RowDependent` marks the
/// jagged list column whose per-row width is given by an earlier column's
/// value on the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeExpr {
    /// No shape: one token
    Scalar,
    /// `(:)` — free trailing content
    Free,
    /// Fixed-rank dimension list, e.g. `(nlay, nrow, ncol)`
    Dims(Vec<Dim>),
    /// Jagged: width given by the named earlier column in the same row
    RowDependent(String),
}

impl ShapeExpr {
    /// Shape with the given literal dimensions.
    pub fn fixed(dims: &[usize]) -> Self {
        ShapeExpr::Dims(dims.iter().copied().map(Dim::Fixed).collect())
    }

    /// Shape with a single dimension named by a resolver path.
    pub fn named(path: impl Into<KeyPath>) -> Self {
        ShapeExpr::Dims(vec![Dim::Named(path.into())])
    }

    /// Shape with the given mixed dimensions.
    pub fn dims(dims: Vec<Dim>) -> Self {
        ShapeExpr::Dims(dims)
    }

    /// Check if this is the unshaped scalar case.
    pub fn is_scalar(&self) -> bool {
        matches!(self, ShapeExpr::Scalar)
    }

    /// Check if this is the `(:)` free shape.
    pub fn is_free(&self) -> bool {
        matches!(self, ShapeExpr::Free)
    }

    /// Check if this shape is jagged.
    pub fn is_row_dependent(&self) -> bool {
        matches!(self, ShapeExpr::RowDependent(_))
    }

    /// Rank of the shape, where known statically.
    pub fn rank(&self) -> usize {
        match self {
            ShapeExpr::Scalar | ShapeExpr::Free | ShapeExpr::RowDependent(_) => 0,
            ShapeExpr::Dims(dims) => dims.len(),
        }
    }
}

impl fmt::Display for ShapeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeExpr::Scalar => Ok(()),
            ShapeExpr::Free => write!(f, "(:)"),
            ShapeExpr::Dims(dims) => {
                write!(f, "(")?;
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{d}")?;
                }
                write!(f, ")")
            }
            ShapeExpr::RowDependent(col) => write!(f, "({col})"),
        }
    }
}
