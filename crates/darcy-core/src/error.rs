//! Engine errors
//!
//! All failures are synchronous and fail-fast: a load error leaves the
//! enclosing block partial and it must not be used. Nothing here retries or
//! downgrades.

use thiserror::Error;

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected end of input while reading {0}")]
    Eof(String),

    #[error("invalid parameter: {0}")]
    UnknownParam(String),

    #[error("unknown parameters: {0:?}")]
    UnknownParams(Vec<String>),

    #[error("record line may not be empty")]
    EmptyRecord,

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("row count {count} exceeds declared bound {bound}")]
    BoundExceeded { count: usize, bound: usize },

    #[error("ambiguous column layout: {0}")]
    AmbiguousLayout(String),

    #[error("path segment not found: {0}")]
    NotFound(String),

    #[error("bad token '{token}': expected {expected}")]
    BadToken { token: String, expected: String },

    #[error("expected {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("layer index {index} out of range for {layers} layers")]
    LayerOutOfRange { index: usize, layers: usize },

    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },

    #[error("column lengths differ: {0}")]
    LengthMismatch(String),

    #[error("unsupported component kind for {0}")]
    UnsupportedComponent(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::BadToken`] with owned parts.
    pub(crate) fn bad_token(token: impl Into<String>, expected: impl Into<String>) -> Self {
        Error::BadToken {
            token: token.into(),
            expected: expected.into(),
        }
    }
}
