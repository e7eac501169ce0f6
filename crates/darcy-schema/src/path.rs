//! Key paths for cross-component lookups
//!
//! Paths are slash-separated component names used to address a value owned
//! by a sibling or ancestor component:
//! - `sim/model/dis/nlay`
//! - `dimensions/nbound`
//!
//! The resolver in `darcy-core` walks these segment by segment over a
//! component tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A hierarchical path addressing a parameter in a component tree.
///
/// Paths are immutable and support efficient comparison and hashing.
/// Schema tables store them wherever a shape dimension or bound refers to a
/// value declared elsewhere.
///
/// # Examples
///
/// ```
/// # use darcy_schema::KeyPath;
/// let path = KeyPath::from("dis/nlay");
/// assert_eq!(path.segments(), &["dis", "nlay"]);
/// assert_eq!(path.to_string(), "dis/nlay");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Create a new path from a vector of segments.
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a path from a slash-separated string.
    pub fn parse(s: &str) -> Self {
        Self {
            segments: s.split('/').map(String::from).collect(),
        }
    }

    /// Get the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the first segment.
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Get the last segment (the parameter name).
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Append a segment to create a new path.
    pub fn append(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self::new(segments)
    }

    /// Get the parent path (all segments except the last).
    ///
    /// Returns None if this is a single-segment path.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            None
        } else {
            Some(Self::new(self.segments[..self.segments.len() - 1].to_vec()))
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for KeyPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}
