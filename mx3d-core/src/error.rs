use thiserror::Error;

/// Errors produced when a transform cannot yield a mathematically valid result.
///
/// Every variant is a deterministic rejection of the given inputs; retrying
/// with the same arguments fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("matrix is singular (determinant {determinant:e})")]
    SingularMatrix { determinant: f64 },

    #[error("degenerate projection: homogeneous w = {w:e}")]
    DegenerateProjection { w: f64 },

    #[error("invalid frustum: {0}")]
    InvalidFrustum(String),

    #[error("degenerate basis: {0}")]
    DegenerateBasis(String),

    #[error("invalid euler order `{0}`: expected a permutation of x, y and z")]
    InvalidEulerOrder(String),

    #[error("matrix must be 4x4, got {rows}x{cols}")]
    InvalidShape { rows: usize, cols: usize },

    #[error("invalid transform expression: {0}")]
    InvalidExpression(String),
}

/// Convenience type alias for results using [`TransformError`].
pub type Result<T> = std::result::Result<T, TransformError>;
