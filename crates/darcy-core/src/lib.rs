// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Typed read/write engine for MODFLOW 6 style block-structured input.
//!
//! The engine loads a textual stream into a strongly-typed, mutable object
//! graph driven by schema tables from `darcy-schema`, and re-serializes the
//! graph back to the same text format.
//!
//! # Architecture
//!
//! - [`stream`] — line stream with lookahead and rewind; the only front end
//!   the engine consumes.
//! - [`scalar`] — single typed values with keyword-presence semantics.
//! - [`array`] — the storage-mode engine: constant / internal / external
//!   representations, layered arrays, lazy multiplicative factors.
//! - [`compound`] — record (product), keystring (sum), and list (table)
//!   parameters.
//! - [`block`] — the BEGIN/END state machine orchestrating per-parameter
//!   load and write through schema dispatch.
//! - [`resolve`] — read-only hierarchical path lookups over a component
//!   tree, used for shape dimensions and bounds owned by other components.
//!
//! # Examples
//!
//! ```
//! use darcy_core::{Block, LineStream, LoadContext};
//! use darcy_schema::{BlockSpec, ParamSpec};
//! use std::sync::Arc;
//!
//! let spec = Arc::new(BlockSpec::new(
//!     "options",
//!     vec![ParamSpec::keyword("save_flows"), ParamSpec::double("hclose")],
//! ));
//! let text = "BEGIN OPTIONS\n  SAVE_FLOWS\n  HCLOSE 0.001\nEND OPTIONS\n";
//! let mut stream = LineStream::new(text);
//! let ctx = LoadContext::new(".");
//! let block = Block::load(spec, &mut stream, &ctx).unwrap();
//! assert_eq!(block.name(), "options");
//! ```

pub mod array;
pub mod block;
pub mod compound;
pub mod error;
pub mod param;
pub mod resolve;
pub mod scalar;
pub mod stream;

pub use array::{Array, ArrayMode, ArrayStorage, Element, LayerData};
pub use block::{Block, Blocks};
pub use compound::{Keystring, List, Record};
pub use error::{Error, Result};
pub use param::{Param, ValueList};
pub use resolve::{resolve, LoadContext, Node};
pub use scalar::Scalar;
pub use stream::LineStream;
