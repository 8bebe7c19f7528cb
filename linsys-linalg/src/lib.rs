//! linsys-linalg: Dense linear algebra for linsys
//!
//! Provides the `Vector` and `Matrix` types, elimination-based determinant,
//! inverse and direct solve, SVD-backed pseudoinverse, a positive
//! definiteness check, and the Conjugate Gradient solver.
//!
//! Every operation opens a `debug`-level tracing span (`matrix.det`,
//! `matrix.inverse`, `cg.solve`, ...). Nothing is recorded unless the
//! caller installs a `tracing` subscriber.

pub mod cg;
pub mod decomposition;
pub mod elimination;
pub mod error;
pub mod matrix;
pub mod vector;

pub use cg::{CgConfig, CgResult, ConjugateGradient};
pub use error::{LinalgError, Result};
pub use matrix::Matrix;
pub use vector::Vector;
