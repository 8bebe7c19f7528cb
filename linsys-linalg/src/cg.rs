//! Conjugate Gradient (CG) solver for symmetric positive definite systems.
//!
//! Matrix-free: the operator is supplied as a closure computing `A * v`,
//! with `solve_dense` as the convenience entry point for a `Matrix`.

use tracing::{debug, debug_span, trace};

use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Configuration for the CG iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct CgConfig {
    /// Convergence tolerance on the residual norm, relative to `max(||b||, 1)`.
    pub tol: f64,
    /// Iteration cap. `None` means `max(100, 10 * n)`.
    pub max_iter: Option<usize>,
}

impl Default for CgConfig {
    fn default() -> Self {
        Self {
            tol: 1e-10,
            max_iter: None,
        }
    }
}

impl CgConfig {
    pub fn new(tol: f64, max_iter: usize) -> Self {
        Self {
            tol,
            max_iter: Some(max_iter),
        }
    }

    /// Iteration cap for a system of dimension `n`.
    pub fn max_iter_for(&self, n: usize) -> usize {
        self.max_iter.unwrap_or_else(|| 100.max(10 * n))
    }
}

/// Result of a converged CG solve.
#[derive(Debug, Clone)]
pub struct CgResult {
    /// Solution vector x.
    pub x: Vector,
    /// Number of iterations used.
    pub iterations: usize,
    /// Final residual norm ||b - A x||.
    pub residual: f64,
}

/// Conjugate Gradient solver.
#[derive(Debug, Clone, Default)]
pub struct ConjugateGradient {
    pub config: CgConfig,
}

impl ConjugateGradient {
    pub fn new(config: CgConfig) -> Self {
        Self { config }
    }

    /// Solve A * x = b.
    ///
    /// - `mat_vec`: function computing A * v
    /// - `b`: right-hand side vector
    /// - `x0`: optional initial guess (if None, uses zero vector)
    ///
    /// Fails with `NotConverged` when the cap is reached and with
    /// `NotPositiveDefinite` when a search direction has non-positive
    /// curvature.
    pub fn solve<F>(&self, mat_vec: F, b: &Vector, x0: Option<&Vector>) -> Result<CgResult>
    where
        F: Fn(&Vector) -> Vector,
    {
        let n = b.len();
        let max_iter = self.config.max_iter_for(n);
        let _scope = debug_span!("cg.solve", n, max_iter).entered();

        let mut x = match x0 {
            Some(v) if v.len() != n => {
                return Err(LinalgError::mismatch("cg initial guess", (n, 1), (v.len(), 1)));
            }
            Some(v) => v.clone(),
            None => Vector::zeros(n),
        };

        // r = b - A*x
        let mut r = match x0 {
            Some(_) => b.sub(&mat_vec(&x))?,
            None => b.clone(),
        };
        let mut d = r.clone();
        let mut rr = r.dot(&r)?;

        let tol_abs = self.config.tol * b.norm().max(1.0);

        for iter in 0..max_iter {
            let r_norm = rr.sqrt();
            trace!(iter, residual = r_norm, "cg iteration");
            if r_norm <= tol_abs {
                debug!("CG converged in {} iterations (residual: {:.2e})", iter, r_norm);
                return Ok(CgResult {
                    x,
                    iterations: iter,
                    residual: r_norm,
                });
            }

            let ad = mat_vec(&d);
            let dad = d.dot(&ad)?;
            if dad <= 0.0 {
                return Err(LinalgError::NotPositiveDefinite);
            }
            let alpha = rr / dad;

            x.axpy(alpha, &d);
            r.axpy(-alpha, &ad);

            let rr_new = r.dot(&r)?;
            let beta = rr_new / rr;
            rr = rr_new;

            // d = r + beta * d
            for (di, ri) in d.as_mut_slice().iter_mut().zip(r.iter()) {
                *di = ri + beta * *di;
            }
        }

        let r_norm = rr.sqrt();
        if r_norm <= tol_abs {
            return Ok(CgResult {
                x,
                iterations: max_iter,
                residual: r_norm,
            });
        }
        Err(LinalgError::NotConverged {
            max_iter,
            residual: r_norm,
        })
    }

    /// Solve with a dense matrix A.
    pub fn solve_dense(&self, a: &Matrix, b: &Vector) -> Result<CgResult> {
        if !a.is_square() || a.ncols() != b.len() {
            return Err(LinalgError::mismatch(
                "conjugate gradient",
                a.shape(),
                (b.len(), 1),
            ));
        }
        self.solve(|v| a.mat_vec_unchecked(v), b, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spd3() -> Matrix {
        Matrix::from_rows(&[[4.0, 2.0, 1.0], [2.0, 5.0, 3.0], [1.0, 3.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_default_cap() {
        let cfg = CgConfig::default();
        assert_eq!(cfg.max_iter_for(3), 100);
        assert_eq!(cfg.max_iter_for(50), 500);
        assert_eq!(CgConfig::new(1e-8, 7).max_iter_for(50), 7);
    }

    #[test]
    fn test_cg_identity() {
        let a = Matrix::identity(3);
        let b = Vector::from([1.0, 2.0, 3.0]);
        let result = ConjugateGradient::default().solve_dense(&a, &b).unwrap();
        assert!(result.iterations <= 1);
        for (xi, bi) in result.x.iter().zip(b.iter()) {
            assert!((xi - bi).abs() < 1e-10);
        }
    }

    #[test]
    fn test_cg_spd() {
        let a = spd3();
        let b = Vector::from([1.0, 2.0, 3.0]);
        let result = ConjugateGradient::default().solve_dense(&a, &b).unwrap();
        // Exact arithmetic converges in n steps; allow a little slack.
        assert!(result.iterations <= 5, "iterations = {}", result.iterations);
        let ax = a.mat_vec(&result.x).unwrap();
        for i in 1..=3 {
            assert!(
                (ax.get(i).unwrap() - b.get(i).unwrap()).abs() < 1e-8,
                "CG: ax[{}] != b[{}]",
                i,
                i
            );
        }
    }

    #[test]
    fn test_cg_zero_rhs() {
        let result = ConjugateGradient::default()
            .solve_dense(&spd3(), &Vector::zeros(3))
            .unwrap();
        assert_eq!(result.iterations, 0);
        assert_eq!(result.x, Vector::zeros(3));
    }

    #[test]
    fn test_cg_initial_guess() {
        let a = spd3();
        let b = Vector::from([1.0, 2.0, 3.0]);
        let cg = ConjugateGradient::default();
        let exact = a.solve(&b).unwrap();
        let result = cg.solve(|v| a.mat_vec(v).unwrap(), &b, Some(&exact)).unwrap();
        assert_eq!(result.iterations, 0);
        assert!(cg
            .solve(|v| a.mat_vec(v).unwrap(), &b, Some(&Vector::zeros(2)))
            .is_err());
    }

    #[test]
    fn test_cg_iteration_cap() {
        let a = spd3();
        let b = Vector::from([1.0, 2.0, 3.0]);
        let cg = ConjugateGradient::new(CgConfig::new(1e-14, 1));
        match cg.solve_dense(&a, &b) {
            Err(LinalgError::NotConverged { max_iter, residual }) => {
                assert_eq!(max_iter, 1);
                assert!(residual > 0.0);
            }
            other => panic!("expected NotConverged, got {:?}", other),
        }
    }

    #[test]
    fn test_cg_indefinite() {
        let a = Matrix::from_rows(&[[1.0, 0.0], [0.0, -1.0]]).unwrap();
        let b = Vector::from([0.0, 1.0]);
        assert!(matches!(
            ConjugateGradient::default().solve_dense(&a, &b),
            Err(LinalgError::NotPositiveDefinite)
        ));
    }

    #[test]
    fn test_cg_shape_mismatch() {
        assert!(matches!(
            ConjugateGradient::default().solve_dense(&Matrix::zeros(2, 3), &Vector::zeros(2)),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }
}
