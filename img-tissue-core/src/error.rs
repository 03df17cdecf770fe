use crate::Scalar;

/// Convenience result type used across img-tissue.
pub type TissueResult<T> = Result<T, TissueError>;

/// Error thrown at img-tissue input boundaries.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TissueError {
    /// Grid size value could not be parsed.
    #[error("invalid grid value: {0:?}")]
    InvalidGridValue(String),
    /// Image dimensions are not finite and positive.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: Scalar, height: Scalar },
    /// Serialized mesh does not match its grid.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}
