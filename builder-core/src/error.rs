//! Error types for builder operations.

use thiserror::Error;

/// Result type for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur in builder operations.
///
/// Most of these never reach the UI: tree operations absorb
/// [`BuilderError::NotFound`] and style parsing recovers from malformed
/// persisted values. They exist so the recovering caller can tell the
/// conditions apart and log them.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Node not found in the tree.
    #[error("Node not found: {0}")]
    NotFound(String),

    /// A persisted `backgroundImage` is not a linear gradient.
    #[error("Malformed gradient string: {0:?}")]
    MalformedGradientString(String),

    /// A present spacing value is not a one- or four-token px shorthand.
    #[error("Malformed spacing shorthand: {0:?}")]
    MalformedSpacingShorthand(String),

    /// A side/axis label does not name a spacing direction.
    #[error("Invalid direction token: {0:?}")]
    InvalidDirectionToken(String),

    /// A style key is not a plain property name.
    #[error("Invalid style key: {0:?}")]
    InvalidStyleKey(String),

    /// A tree or form document violates a structural invariant.
    #[error("Invalid form document: {0}")]
    InvalidDocument(String),

    /// Form serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
