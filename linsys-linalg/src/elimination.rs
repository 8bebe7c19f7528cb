#![allow(clippy::needless_range_loop)]
//! Elimination-based operations: determinant, inverse and direct solve.
//!
//! `det` eliminates without row exchanges and only rejects tiny pivots, so
//! it fails on matrices such as `[[0, 1], [1, 0]]` even though they are
//! perfectly regular. `inverse` and `solve` use partial pivoting.

use tracing::debug_span;

use crate::error::{LinalgError, Result};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Pivot magnitude below which `det` reports a zero pivot.
pub const DET_PIVOT_TOL: f64 = 1e-10;

/// Pivot magnitude below which `inverse` and `solve` report a singular matrix.
pub const INVERSE_PIVOT_TOL: f64 = 1e-12;

impl Matrix {
    fn require_square(&self, op: &'static str) -> Result<usize> {
        if !self.is_square() {
            return Err(LinalgError::mismatch(
                op,
                self.shape(),
                (self.ncols(), self.nrows()),
            ));
        }
        Ok(self.nrows())
    }

    /// Determinant by forward elimination without row pivoting.
    ///
    /// Fails with `ZeroPivot` when a diagonal pivot drops below
    /// `DET_PIVOT_TOL`, even if a row exchange would have fixed it.
    pub fn det(&self) -> Result<f64> {
        let _scope = debug_span!(
            "matrix.det",
            matrix = self.label(),
            rows = self.nrows(),
            cols = self.ncols()
        )
        .entered();
        let n = self.require_square("determinant")?;
        let mut work = self.clone();

        for j in 0..n {
            let pivot = work.at(j, j);
            if pivot.abs() < DET_PIVOT_TOL {
                return Err(LinalgError::ZeroPivot {
                    row: j + 1,
                    pivot: pivot.abs(),
                });
            }
            for i in (j + 1)..n {
                let factor = work.at(i, j) / pivot;
                for k in j..n {
                    let v = work.at(j, k);
                    *work.at_mut(i, k) -= factor * v;
                }
            }
        }

        Ok((0..n).map(|i| work.at(i, i)).product())
    }

    /// Inverse of a square matrix, optionally naming the result.
    ///
    /// 2x2 matrices use the closed-form cofactor formula. Everything else
    /// goes through Gauss-Jordan elimination on `[A | I]` with partial
    /// pivoting.
    pub fn inverse(&self, name: Option<&str>) -> Result<Matrix> {
        let _scope = debug_span!(
            "matrix.inverse",
            matrix = self.label(),
            rows = self.nrows(),
            cols = self.ncols()
        )
        .entered();
        let n = self.require_square("inverse")?;
        let result_name = name.unwrap_or(self.label());

        let inv = if n == 2 {
            self.inverse_2x2(result_name)?
        } else {
            self.inverse_gauss_jordan(n, result_name)?
        };

        Ok(match name {
            Some(name) => inv.with_name(name),
            None => inv,
        })
    }

    fn inverse_2x2(&self, name: &str) -> Result<Matrix> {
        let (a, b, c, d) = (self.at(0, 0), self.at(0, 1), self.at(1, 0), self.at(1, 1));
        let det = a * d - b * c;
        if det.abs() < INVERSE_PIVOT_TOL {
            return Err(LinalgError::Singular {
                name: name.to_string(),
                pivot: det.abs(),
            });
        }
        Matrix::from_row_major(2, 2, vec![d / det, -b / det, -c / det, a / det])
    }

    fn inverse_gauss_jordan(&self, n: usize, name: &str) -> Result<Matrix> {
        let mut aug = Matrix::zeros(n, 2 * n);
        for i in 0..n {
            for j in 0..n {
                *aug.at_mut(i, j) = self.at(i, j);
            }
            *aug.at_mut(i, n + i) = 1.0;
        }

        for i in 0..n {
            let pivot_row = pivot_row(&aug, i, n);
            let pivot = aug.at(pivot_row, i);
            if pivot.abs() < INVERSE_PIVOT_TOL {
                return Err(LinalgError::Singular {
                    name: name.to_string(),
                    pivot: pivot.abs(),
                });
            }
            aug.swap_rows(i, pivot_row);

            for j in 0..2 * n {
                *aug.at_mut(i, j) /= pivot;
            }
            for k in 0..n {
                if k == i {
                    continue;
                }
                let factor = aug.at(k, i);
                for j in 0..2 * n {
                    let v = aug.at(i, j);
                    *aug.at_mut(k, j) -= factor * v;
                }
            }
        }

        let mut result = Matrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                *result.at_mut(i, j) = aug.at(i, n + j);
            }
        }
        Ok(result)
    }

    /// Solve `self * x = b` by Gaussian elimination with partial pivoting
    /// and back-substitution. Neither `self` nor `b` is modified.
    pub fn solve(&self, b: &Vector) -> Result<Vector> {
        let _scope = debug_span!(
            "matrix.solve",
            matrix = self.label(),
            rows = self.nrows(),
            cols = self.ncols()
        )
        .entered();
        let n = self.require_square("gaussian elimination")?;
        if b.len() != n {
            return Err(LinalgError::mismatch(
                "gaussian elimination",
                self.shape(),
                (b.len(), 1),
            ));
        }

        let mut a = self.clone();
        let mut rhs = b.clone();

        // Forward elimination
        for j in 0..n {
            let p = pivot_row(&a, j, n);
            let pivot = a.at(p, j);
            if pivot.abs() < INVERSE_PIVOT_TOL {
                return Err(LinalgError::Singular {
                    name: self.label().to_string(),
                    pivot: pivot.abs(),
                });
            }
            a.swap_rows(j, p);
            rhs.as_mut_slice().swap(j, p);

            for i in (j + 1)..n {
                let factor = a.at(i, j) / pivot;
                for k in j..n {
                    let v = a.at(j, k);
                    *a.at_mut(i, k) -= factor * v;
                }
                let r = rhs.as_slice()[j];
                rhs.as_mut_slice()[i] -= factor * r;
            }
        }

        // Back substitution
        let y = rhs.as_slice();
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for j in (i + 1)..n {
                sum += a.at(i, j) * x[j];
            }
            x[i] = (y[i] - sum) / a.at(i, i);
        }
        Ok(Vector::from(x))
    }
}

/// Row index in `[col, n)` with the largest magnitude entry in `col`.
fn pivot_row(m: &Matrix, col: usize, n: usize) -> usize {
    let mut best = col;
    for k in (col + 1)..n {
        if m.at(k, col).abs() > m.at(best, col).abs() {
            best = k;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn assert_identity(p: &Matrix, tol: f64) {
        let n = p.nrows();
        for i in 1..=n {
            for j in 1..=n {
                let expected = if i == j { 1.0 } else { 0.0 };
                let got = p.get(i, j).unwrap();
                assert!(
                    (got - expected).abs() < tol,
                    "P[{},{}] = {}, expected {}",
                    i,
                    j,
                    got,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_det() {
        let a = m(&[&[2.0, -1.0, 0.0], &[-1.0, 2.0, -1.0], &[0.0, -1.0, 2.0]]);
        assert!((a.det().unwrap() - 4.0).abs() < 1e-10);
        assert!((m(&[&[1.0, 2.0], &[3.0, 4.0]]).det().unwrap() + 2.0).abs() < 1e-12);
        assert_eq!(Matrix::zeros(0, 0).det().unwrap(), 1.0);
    }

    #[test]
    fn test_det_needs_row_exchange() {
        let a = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        assert!(matches!(
            a.det(),
            Err(LinalgError::ZeroPivot { row: 1, .. })
        ));
    }

    #[test]
    fn test_det_propagates_non_finite_entries() {
        // The zero below the first pivot still multiplies the NaN.
        let a = m(&[&[2.0, f64::NAN], &[0.0, 1.0]]);
        assert!(a.det().unwrap().is_nan());
    }

    #[test]
    fn test_det_non_square() {
        assert!(matches!(
            Matrix::zeros(2, 3).det(),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_inverse_2x2_closed_form() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let inv = a.inverse(None).unwrap();
        let expected = [[-2.0, 1.0], [1.5, -0.5]];
        for i in 0..2 {
            for j in 0..2 {
                assert!((inv.get(i + 1, j + 1).unwrap() - expected[i][j]).abs() < 1e-12);
            }
        }
        assert_identity(&a.mat_mul(&inv).unwrap(), 1e-12);
    }

    #[test]
    fn test_inverse_gauss_jordan_with_pivoting() {
        // Zero on the leading diagonal forces a row exchange.
        let a = m(&[&[0.0, 2.0, 1.0], &[1.0, 0.0, 3.0], &[4.0, 1.0, 0.0]]);
        let inv = a.inverse(Some("a_inv")).unwrap();
        assert_eq!(inv.name(), Some("a_inv"));
        assert_identity(&a.mat_mul(&inv).unwrap(), 1e-12);
        assert_identity(&inv.mat_mul(&a).unwrap(), 1e-12);
    }

    #[test]
    fn test_inverse_one_by_one() {
        let inv = m(&[&[4.0]]).inverse(None).unwrap();
        assert_eq!(inv.get(1, 1).unwrap(), 0.25);
    }

    #[test]
    fn test_inverse_singular() {
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert!(matches!(a.inverse(None), Err(LinalgError::Singular { .. })));

        let b = m(&[&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0], &[1.0, 0.0, 1.0]]).with_name("B");
        match b.inverse(None) {
            Err(LinalgError::Singular { name, .. }) => assert_eq!(name, "B"),
            other => panic!("expected singular error, got {:?}", other),
        }
    }

    #[test]
    fn test_solve() {
        let a = m(&[&[2.0, -1.0, 0.0], &[-1.0, 2.0, -1.0], &[0.0, -1.0, 2.0]]);
        let b = Vector::from([1.0, 0.0, 1.0]);
        let x = a.solve(&b).unwrap();
        for xi in x.iter() {
            assert!((xi - 1.0).abs() < 1e-12);
        }
        assert_eq!(b.as_slice(), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_solve_requires_pivoting() {
        let a = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let x = a.solve(&Vector::from([2.0, 3.0])).unwrap();
        assert_eq!(x.as_slice(), &[3.0, 2.0]);
    }

    #[test]
    fn test_solve_errors() {
        let a = Matrix::identity(3);
        assert!(matches!(
            a.solve(&Vector::zeros(2)),
            Err(LinalgError::DimensionMismatch { .. })
        ));
        let s = m(&[&[1.0, 1.0], &[1.0, 1.0]]);
        assert!(matches!(
            s.solve(&Vector::zeros(2)),
            Err(LinalgError::Singular { .. })
        ));
    }
}
