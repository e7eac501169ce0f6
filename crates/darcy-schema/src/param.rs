//! Parameter descriptors
//!
//! A [`ParamSpec`] declares one named input parameter: its kind, shape,
//! optionality, and default. Compound kinds carry the descriptors of their
//! components, so a block schema is a tree of `ParamSpec` values with the
//! block table at the root.
//!
//! Descriptors are plain data. Constructors below mirror how definition
//! tables are written by hand or generated: start from the kind, then chain
//! the handful of modifiers that deviate from the common case.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::path::KeyPath;
use crate::shape::ShapeExpr;
use crate::value::Value;

/// Scalar parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    /// Presence flag, no value tokens
    Keyword,
    /// Integer token
    Int,
    /// Floating point token
    Double,
    /// Single-token string
    Word,
    /// Free text running to the end of the line
    Text,
    /// File path token
    Filename,
}

/// Element type of a numeric array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElemType {
    /// 64-bit signed integers
    Int,
    /// 64-bit floats
    Double,
}

impl ElemType {
    /// Human-readable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ElemType::Int => "integer",
            ElemType::Double => "double",
        }
    }
}

/// Fixed-arity record: an ordered, heterogeneous tuple read from one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSpec {
    /// Component descriptors in parsing order
    pub components: Vec<ParamSpec>,
}

/// Tagged union: one or more keyed entries, each key settable at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeystringSpec {
    /// Component descriptors keyed by name
    pub components: IndexMap<String, ParamSpec>,
}

impl KeystringSpec {
    /// Build the keyed component table from an ordered component list.
    pub fn new(components: Vec<ParamSpec>) -> Self {
        Self {
            components: components
                .into_iter()
                .map(|c| (c.name.clone(), c))
                .collect(),
        }
    }

    /// Check whether `key` names a component.
    pub fn has_key(&self, key: &str) -> bool {
        self.components.contains_key(key)
    }
}

/// Repeating row table, stored column-wise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSpec {
    /// Column descriptors in row order
    pub columns: Vec<ParamSpec>,
    /// Path to a sibling-declared maximum row count, checked when resolvable
    pub bound: Option<KeyPath>,
}

/// Closed set of parameter kinds.
///
/// The engine dispatches on this enum exhaustively; adding a kind is a
/// compile-visible change at every dispatch site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamKind {
    /// Single typed value
    Scalar(ScalarKind),
    /// Dense or compressed numeric array
    Array(ElemType),
    /// Product type: fixed ordered components on one line
    Record(RecordSpec),
    /// Sum type: keyed components, selected by leading token
    Keystring(KeystringSpec),
    /// Repeating rows with a derived column layout
    List(ListSpec),
}

/// Declaration of one input parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name (lowercase)
    pub name: String,
    /// Owning block name, where known
    pub block: Option<String>,
    /// Parameter kind
    pub kind: ParamKind,
    /// Declared shape
    pub shape: ShapeExpr,
    /// Whether the parameter may be omitted
    pub optional: bool,
    /// Whether an array parameter reads one stanza per leading-axis layer
    pub layered: bool,
    /// Default value applied when assignment omits the parameter
    pub default: Option<Value>,
    /// Descriptive name from the upstream definition
    pub longname: Option<String>,
}

impl ParamSpec {
    fn new(name: impl Into<String>, kind: ParamKind, shape: ShapeExpr) -> Self {
        Self {
            name: name.into().to_lowercase(),
            block: None,
            kind,
            shape,
            optional: true,
            layered: false,
            default: None,
            longname: None,
        }
    }

    /// Keyword parameter (presence flag).
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Scalar(ScalarKind::Keyword), ShapeExpr::Scalar)
    }

    /// Integer scalar parameter.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Scalar(ScalarKind::Int), ShapeExpr::Scalar)
    }

    /// Double scalar parameter.
    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Scalar(ScalarKind::Double), ShapeExpr::Scalar)
    }

    /// Single-word string parameter.
    pub fn word(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Scalar(ScalarKind::Word), ShapeExpr::Scalar)
    }

    /// Free-text parameter (rest of line).
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Scalar(ScalarKind::Text), ShapeExpr::Scalar)
    }

    /// File path parameter.
    pub fn filename(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Scalar(ScalarKind::Filename), ShapeExpr::Scalar)
    }

    /// Integer array parameter with the given shape.
    pub fn int_array(name: impl Into<String>, shape: ShapeExpr) -> Self {
        Self::new(name, ParamKind::Array(ElemType::Int), shape)
    }

    /// Double array parameter with the given shape.
    pub fn double_array(name: impl Into<String>, shape: ShapeExpr) -> Self {
        Self::new(name, ParamKind::Array(ElemType::Double), shape)
    }

    /// Record parameter with the given ordered components.
    pub fn record(name: impl Into<String>, components: Vec<ParamSpec>) -> Self {
        Self::new(
            name,
            ParamKind::Record(RecordSpec { components }),
            ShapeExpr::Scalar,
        )
    }

    /// Keystring (union) parameter with the given components.
    pub fn keystring(name: impl Into<String>, components: Vec<ParamSpec>) -> Self {
        Self::new(
            name,
            ParamKind::Keystring(KeystringSpec::new(components)),
            ShapeExpr::Scalar,
        )
    }

    /// List (table) parameter with the given columns.
    pub fn list(name: impl Into<String>, columns: Vec<ParamSpec>) -> Self {
        Self::new(
            name,
            ParamKind::List(ListSpec {
                columns,
                bound: None,
            }),
            ShapeExpr::Scalar,
        )
    }

    /// Mark the parameter required.
    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    /// Mark an array parameter layered (one stanza per leading-axis index).
    pub fn layered(mut self) -> Self {
        self.layered = true;
        self
    }

    /// Attach the owning block name.
    pub fn in_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into().to_lowercase());
        self
    }

    /// Attach a default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Attach the upstream longname.
    pub fn with_longname(mut self, longname: impl Into<String>) -> Self {
        self.longname = Some(longname.into());
        self
    }

    /// Attach a row-count bound path to a list parameter.
    ///
    /// No effect on other kinds.
    pub fn with_bound(mut self, bound: impl Into<KeyPath>) -> Self {
        if let ParamKind::List(ref mut spec) = self.kind {
            spec.bound = Some(bound.into());
        }
        self
    }

    /// The keystring component table, if this is a keystring.
    pub fn as_keystring(&self) -> Option<&KeystringSpec> {
        match &self.kind {
            ParamKind::Keystring(ks) => Some(ks),
            _ => None,
        }
    }
}
