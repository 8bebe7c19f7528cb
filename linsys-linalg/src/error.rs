//! Error taxonomy shared by every linear algebra operation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("Shape error: row {row} has {got} entries, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Index {index} is out of bounds for vector of size {len} (1-based)")]
    VectorIndex { index: usize, len: usize },

    #[error("Matrix index ({row}, {col}) is out of range for a {nrows}x{ncols} matrix (1-based)")]
    MatrixIndex {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Zero pivot at row {row} (|pivot| = {pivot:.2e})")]
    ZeroPivot { row: usize, pivot: f64 },

    #[error("Matrix {name} is singular or near-singular (|pivot| = {pivot:.2e})")]
    Singular { name: String, pivot: f64 },

    #[error("Conjugate gradient failed to converge after {max_iter} iterations (residual: {residual:.2e})")]
    NotConverged { max_iter: usize, residual: f64 },

    #[error("Matrix is not positive definite")]
    NotPositiveDefinite,
}

pub type Result<T> = std::result::Result<T, LinalgError>;

impl LinalgError {
    pub(crate) fn mismatch(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        LinalgError::DimensionMismatch { op, left, right }
    }
}
