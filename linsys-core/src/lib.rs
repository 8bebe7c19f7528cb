//! linsys-core: Linear system solving for linsys
//!
//! Wraps the dense algebra of `linsys-linalg` into validated linear
//! systems with three strategies (general, SPD, least squares), plus the
//! regression pipeline built on the least-squares solver.

pub mod regression;
pub mod system;

pub use system::{residual, LinearSystem, SolveStrategy};
