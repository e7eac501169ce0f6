// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Schema descriptors for MODFLOW 6 style input.
//!
//! This crate defines **pure data** describing the shape of an input file:
//! which blocks exist, which parameters each block declares, and what kind,
//! shape, and default every parameter has. The engine in `darcy-core`
//! consumes these tables to drive loading and writing; nothing here performs
//! I/O or holds loaded values.
//!
//! # Design
//!
//! - Schema tables are constructed statically by the caller (or by a
//!   definitions crate such as `darcy-defs`) and passed explicitly to
//!   load/write. There is no runtime reflection and no shared class state.
//! - Parameter kinds form a closed enum ([`ParamKind`]); the engine
//!   dispatches on it exhaustively.
//! - Shapes may reference values owned by other components (e.g. a layer
//!   count declared in a sibling block) via [`KeyPath`] entries resolved at
//!   load time.

pub mod block;
pub mod param;
pub mod path;
pub mod shape;
pub mod value;

pub use block::BlockSpec;
pub use param::{ElemType, KeystringSpec, ListSpec, ParamKind, ParamSpec, RecordSpec, ScalarKind};
pub use path::KeyPath;
pub use shape::{Dim, ShapeExpr};
pub use value::Value;
