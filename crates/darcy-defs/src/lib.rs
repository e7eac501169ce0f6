// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Statically constructed package definitions.
//!
//! One module per supported package, each exposing a function per block
//! that builds its [`BlockSpec`](darcy_schema::BlockSpec) table. These
//! tables are the hand-maintained equivalent of generated definition data:
//! pure schema, no engine logic.
//!
//! Shape dimensions and bounds use resolver paths with a fixed mounting
//! convention: discretization extents live under `dis/` (`dis/nlay`,
//! `dis/nrow`, `dis/ncol`, `dis/ncelldim`) and per-package bounds under
//! the package name (`chd/maxbound`). Callers mount their component trees
//! accordingly.

pub mod chd;
pub mod dis;
pub mod ic;
pub mod oc;
