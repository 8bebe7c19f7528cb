//! Linear systems A * x = b and the strategies used to solve them.
//!
//! A `LinearSystem` borrows its coefficient matrix and right-hand side;
//! the caller keeps ownership. Construction validates the invariants of
//! the chosen strategy, and `solve` consumes the system, so each one
//! produces exactly one solution.

use tracing::debug;

use linsys_linalg::{CgConfig, ConjugateGradient, LinalgError, Matrix, Result, Vector};

/// How a system is solved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveStrategy {
    /// Square A, Gaussian elimination with back-substitution.
    General,
    /// Symmetric positive definite A, Conjugate Gradient.
    SymmetricPositiveDefinite,
    /// Rectangular A. `lambda == 0` uses the pseudoinverse, `lambda > 0`
    /// solves the ridge-regularized normal equations.
    LeastSquares { lambda: f64 },
}

impl std::fmt::Display for SolveStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStrategy::General => write!(f, "general (gaussian elimination)"),
            SolveStrategy::SymmetricPositiveDefinite => write!(f, "spd (conjugate gradient)"),
            SolveStrategy::LeastSquares { lambda } if *lambda == 0.0 => {
                write!(f, "least squares (pseudoinverse)")
            }
            SolveStrategy::LeastSquares { lambda } => {
                write!(f, "least squares (ridge, lambda = {})", lambda)
            }
        }
    }
}

/// A validated linear system awaiting `solve`.
#[derive(Debug)]
pub struct LinearSystem<'a> {
    a: &'a Matrix,
    b: &'a Vector,
    strategy: SolveStrategy,
    cg: CgConfig,
}

impl<'a> LinearSystem<'a> {
    /// Square system solved by Gaussian elimination.
    pub fn general(a: &'a Matrix, b: &'a Vector) -> Result<Self> {
        check_square(a, b)?;
        Ok(Self::unchecked(a, b, SolveStrategy::General))
    }

    /// Symmetric positive definite system solved by Conjugate Gradient.
    ///
    /// Only symmetry is checked up front; an indefinite matrix surfaces as
    /// `NotPositiveDefinite` from `solve`.
    pub fn symmetric_positive_definite(a: &'a Matrix, b: &'a Vector) -> Result<Self> {
        check_square(a, b)?;
        if !a.is_symmetric() {
            return Err(LinalgError::InvalidArgument(
                "matrix is not symmetric".to_string(),
            ));
        }
        Ok(Self::unchecked(a, b, SolveStrategy::SymmetricPositiveDefinite))
    }

    /// Least-squares system with optional ridge regularization (`lambda >= 0`).
    pub fn least_squares(a: &'a Matrix, b: &'a Vector, lambda: f64) -> Result<Self> {
        if a.nrows() != b.len() {
            return Err(LinalgError::InvalidArgument(format!(
                "incompatible matrix/vector sizes: {} rows vs {} entries",
                a.nrows(),
                b.len()
            )));
        }
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(LinalgError::InvalidArgument(format!(
                "regularization must be a non-negative number, got {}",
                lambda
            )));
        }
        Ok(Self::unchecked(a, b, SolveStrategy::LeastSquares { lambda }))
    }

    /// Build a system for an explicit strategy.
    pub fn with_strategy(a: &'a Matrix, b: &'a Vector, strategy: SolveStrategy) -> Result<Self> {
        match strategy {
            SolveStrategy::General => Self::general(a, b),
            SolveStrategy::SymmetricPositiveDefinite => Self::symmetric_positive_definite(a, b),
            SolveStrategy::LeastSquares { lambda } => Self::least_squares(a, b, lambda),
        }
    }

    fn unchecked(a: &'a Matrix, b: &'a Vector, strategy: SolveStrategy) -> Self {
        Self {
            a,
            b,
            strategy,
            cg: CgConfig::default(),
        }
    }

    /// Override the Conjugate Gradient settings (SPD strategy only).
    pub fn with_cg_config(mut self, cg: CgConfig) -> Self {
        self.cg = cg;
        self
    }

    pub fn strategy(&self) -> SolveStrategy {
        self.strategy
    }

    pub fn matrix(&self) -> &Matrix {
        self.a
    }

    pub fn rhs(&self) -> &Vector {
        self.b
    }

    /// Solve the system. Consumes it; A and b are left untouched.
    pub fn solve(self) -> Result<Vector> {
        debug!(
            "Solving {}x{} system with strategy: {}",
            self.a.nrows(),
            self.a.ncols(),
            self.strategy
        );
        match self.strategy {
            SolveStrategy::General => self.a.solve(self.b),
            SolveStrategy::SymmetricPositiveDefinite => {
                let result = ConjugateGradient::new(self.cg).solve_dense(self.a, self.b)?;
                debug!(
                    "CG finished after {} iterations (residual: {:.2e})",
                    result.iterations, result.residual
                );
                Ok(result.x)
            }
            SolveStrategy::LeastSquares { lambda } if lambda == 0.0 => {
                self.a.pseudoinverse().mat_vec(self.b)
            }
            SolveStrategy::LeastSquares { lambda } => {
                let at = self.a.transpose();
                let regularized = self
                    .a
                    .gram()
                    .add(&Matrix::identity(self.a.ncols()).scale(lambda))?;
                let atb = at.mat_vec(self.b)?;
                regularized.inverse(Some("reginv"))?.mat_vec(&atb)
            }
        }
    }
}

/// Residual vector b - A * x.
pub fn residual(a: &Matrix, x: &Vector, b: &Vector) -> Result<Vector> {
    b.sub(&a.mat_vec(x)?)
}

fn check_square(a: &Matrix, b: &Vector) -> Result<()> {
    if !a.is_square() {
        return Err(LinalgError::InvalidArgument(format!(
            "matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    if a.nrows() != b.len() {
        return Err(LinalgError::InvalidArgument(format!(
            "incompatible matrix/vector sizes: {} rows vs {} entries",
            a.nrows(),
            b.len()
        )));
    }
    Ok(())
}
