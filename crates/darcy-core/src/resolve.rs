//! Hierarchical path resolution
//!
//! Components form a tree of named children; a [`KeyPath`] addresses one
//! leaf value in that tree. Loaders use [`resolve`] to obtain values owned
//! by a sibling or ancestor component — a layer count for an array shape, a
//! declared maximum row count for a list. Resolution is strictly read-only.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use darcy_schema::{KeyPath, ShapeExpr, Value};

use crate::error::{Error, Result};

/// A node in the component tree.
///
/// Branches hold named children; leaves hold resolved values. Callers build
/// the tree from whatever components their simulation is composed of and
/// hand a reference to the loaders through [`LoadContext`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    /// Named children, in insertion order
    Branch(IndexMap<String, Node>),
    /// A leaf parameter value
    Leaf(Value),
}

impl Node {
    /// Create an empty branch node.
    pub fn branch() -> Self {
        Node::Branch(IndexMap::new())
    }

    /// Create a leaf node.
    pub fn leaf(value: Value) -> Self {
        Node::Leaf(value)
    }

    /// Get a child by name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Branch(children) => children.get(name),
            Node::Leaf(_) => None,
        }
    }

    /// Insert a leaf value at the given path, creating intermediate
    /// branches as needed. An existing node at the path is replaced.
    pub fn set(&mut self, path: &KeyPath, value: Value) {
        let mut node = self;
        let segments = path.segments();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if !matches!(node, Node::Branch(_)) {
                *node = Node::branch();
            }
            let Node::Branch(children) = node else {
                unreachable!()
            };
            node = children
                .entry(segment.clone())
                .or_insert_with(Node::branch);
        }
        if let Some(last) = segments.last() {
            if !matches!(node, Node::Branch(_)) {
                *node = Node::branch();
            }
            if let Node::Branch(children) = node {
                children.insert(last.clone(), Node::leaf(value));
            }
        }
    }
}

/// Walk `path` from `root`, returning the leaf value it names.
///
/// Purely read-only. A segment with no matching child — including a final
/// segment that lands on a branch instead of a leaf — fails with
/// [`Error::NotFound`] naming that segment.
pub fn resolve<'a>(root: &'a Node, path: &KeyPath) -> Result<&'a Value> {
    let mut node = root;
    for segment in path.segments() {
        node = node
            .child(segment)
            .ok_or_else(|| Error::NotFound(segment.clone()))?;
    }
    match node {
        Node::Leaf(value) => Ok(value),
        Node::Branch(_) => Err(Error::NotFound(
            path.last().unwrap_or_default().to_string(),
        )),
    }
}

/// Block-local context threaded through every load call.
///
/// Carries the directory of the file being loaded (so relative external
/// array references resolve against it, not the process working directory)
/// and an optional component tree for cross-component lookups.
#[derive(Debug, Clone)]
pub struct LoadContext<'a> {
    dir: PathBuf,
    root: Option<&'a Node>,
}

impl<'a> LoadContext<'a> {
    /// Context rooted at the directory of the stream being loaded.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            root: None,
        }
    }

    /// Attach a component tree for cross-component lookups.
    pub fn with_tree(mut self, root: &'a Node) -> Self {
        self.root = Some(root);
        self
    }

    /// Directory of the file being loaded.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a path through the component tree.
    pub fn resolve(&self, path: &KeyPath) -> Result<&'a Value> {
        let root = self
            .root
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        resolve(root, path)
    }

    /// Resolve a path to a dimension extent (a non-negative integer).
    pub fn dim(&self, path: &KeyPath) -> Result<usize> {
        let value = self.resolve(path)?;
        match value.as_int() {
            Some(n) if n >= 0 => Ok(n as usize),
            _ => Err(Error::bad_token(
                value.to_string(),
                format!("integer dimension at {path}"),
            )),
        }
    }

    /// Resolve a path to a dimension extent, or None if the path does not
    /// resolve. Used for bounds that are only checked when resolvable.
    pub fn try_dim(&self, path: &KeyPath) -> Option<usize> {
        self.dim(path).ok()
    }

    /// Resolve a declared shape to concrete extents.
    ///
    /// Only fixed-rank shapes resolve; the free and row-dependent markers
    /// have no extents outside a list column layout.
    pub fn resolve_shape(&self, shape: &ShapeExpr) -> Result<Vec<usize>> {
        match shape {
            ShapeExpr::Scalar => Ok(vec![1]),
            ShapeExpr::Dims(dims) => dims
                .iter()
                .map(|d| match d {
                    darcy_schema::Dim::Fixed(n) => Ok(*n),
                    darcy_schema::Dim::Named(path) => self.dim(path),
                })
                .collect(),
            ShapeExpr::Free | ShapeExpr::RowDependent(_) => Err(Error::bad_token(
                shape.to_string(),
                "a fixed-rank shape".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Node {
        let mut root = Node::branch();
        root.set(&KeyPath::from("dis/nlay"), Value::Int(3));
        root.set(&KeyPath::from("dis/nrow"), Value::Int(10));
        root.set(&KeyPath::from("dimensions/maxbound"), Value::Int(2));
        root
    }

    #[test]
    fn test_resolve_leaf() {
        let root = tree();
        let v = resolve(&root, &KeyPath::from("dis/nlay")).unwrap();
        assert_eq!(v.as_int(), Some(3));
    }

    #[test]
    fn test_resolve_missing_segment() {
        let root = tree();
        let err = resolve(&root, &KeyPath::from("dis/ncol")).unwrap_err();
        match err {
            Error::NotFound(segment) => assert_eq!(segment, "ncol"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_branch_is_not_a_leaf() {
        let root = tree();
        assert!(resolve(&root, &KeyPath::from("dis")).is_err());
    }

    #[test]
    fn test_context_shape_resolution() {
        let root = tree();
        let ctx = LoadContext::new(".").with_tree(&root);
        let shape = ctx
            .resolve_shape(&ShapeExpr::dims(vec![
                darcy_schema::Dim::Named(KeyPath::from("dis/nlay")),
                darcy_schema::Dim::Fixed(2),
            ]))
            .unwrap();
        assert_eq!(shape, vec![3, 2]);
    }

    #[test]
    fn test_try_dim_unresolvable() {
        let ctx = LoadContext::new(".");
        assert_eq!(ctx.try_dim(&KeyPath::from("dis/nlay")), None);
    }
}
