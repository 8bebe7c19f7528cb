#![allow(clippy::needless_range_loop)]
//! SVD-backed pseudoinverse and the positive definiteness check.
//!
//! The SVD itself is delegated to faer.

use tracing::{debug, debug_span, warn};

use crate::matrix::Matrix;
use crate::vector::dot;

/// Absolute floor below which singular values are treated as zero.
pub const DEFAULT_PINV_TOL: f64 = 1e-16;

impl Matrix {
    /// Moore-Penrose pseudoinverse with a rank-revealing cutoff.
    ///
    /// Singular values at or below `max(DEFAULT_PINV_TOL, eps * max(m, n) * s_max)`
    /// are treated as zero, so a rank deficient matrix yields the minimum-norm
    /// least-squares inverse instead of amplified rounding noise.
    pub fn pseudoinverse(&self) -> Matrix {
        let dim = self.nrows().max(self.ncols()) as f64;
        self.svd_pseudoinverse(|s_max| DEFAULT_PINV_TOL.max(f64::EPSILON * dim * s_max))
    }

    /// Moore-Penrose pseudoinverse `V * diag(s+) * U'` with an absolute cutoff.
    ///
    /// Singular values `<= tolerance` contribute zero instead of their
    /// reciprocal. The result has shape `ncols x nrows`.
    pub fn pseudoinverse_with_tol(&self, tolerance: f64) -> Matrix {
        self.svd_pseudoinverse(|_| tolerance)
    }

    fn svd_pseudoinverse(&self, cutoff: impl Fn(f64) -> f64) -> Matrix {
        let _scope = debug_span!(
            "matrix.pseudoinverse",
            matrix = self.label(),
            rows = self.nrows(),
            cols = self.ncols()
        )
        .entered();
        let (m, n) = self.shape();
        if m == 0 || n == 0 {
            return Matrix::zeros(n, m);
        }

        let svd = self.to_faer().thin_svd();
        let u = svd.u();
        let v = svd.v();
        let s = svd.s_diagonal();
        let k = m.min(n);

        let s_max = (0..k).map(|l| s.read(l)).fold(0.0_f64, f64::max);
        let tolerance = cutoff(s_max);
        let mut s_inv = vec![0.0; k];
        let mut dropped = 0usize;
        for (l, inv) in s_inv.iter_mut().enumerate() {
            let sl = s.read(l);
            if sl > tolerance {
                *inv = 1.0 / sl;
                if sl / s_max < 1e-12 {
                    warn!(
                        "Keeping singular value {:.3e} (condition {:.3e}); result may amplify noise",
                        sl,
                        s_max / sl
                    );
                }
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!(
                "pseudoinverse: treated {} of {} singular values as zero (cutoff {:.3e})",
                dropped, k, tolerance
            );
        }

        let mut result = Matrix::zeros(n, m);
        for i in 0..n {
            for j in 0..m {
                let mut acc = 0.0;
                for (l, &inv) in s_inv.iter().enumerate() {
                    if inv != 0.0 {
                        acc += v.read(i, l) * inv * u.read(j, l);
                    }
                }
                *result.at_mut(i, j) = acc;
            }
        }
        result
    }

    /// Whether the matrix is symmetric positive definite.
    ///
    /// Factors a scratch copy row by row (`A = L * L'`) and gives up at the
    /// first pivot that is not strictly positive. The factor is discarded.
    pub fn is_positive_definite(&self) -> bool {
        if !self.is_symmetric() {
            return false;
        }
        let n = self.nrows();
        let mut l = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..=i {
                let (row_i, row_j) = (&l[i * n..i * n + j], &l[j * n..j * n + j]);
                let s = self.at(i, j) - dot(row_i, row_j);
                if i == j {
                    if s.is_nan() || s <= 0.0 {
                        return false;
                    }
                    l[i * n + i] = s.sqrt();
                } else {
                    l[i * n + j] = s / l[j * n + j];
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    fn assert_close(a: &Matrix, b: &Matrix, tol: f64) {
        assert_eq!(a.shape(), b.shape());
        for i in 1..=a.nrows() {
            for j in 1..=a.ncols() {
                let (x, y) = (a.get(i, j).unwrap(), b.get(i, j).unwrap());
                assert!((x - y).abs() < tol, "[{},{}]: {} vs {}", i, j, x, y);
            }
        }
    }

    #[test]
    fn test_pseudoinverse_square_matches_inverse() {
        let a = m(&[&[4.0, 1.0, 2.0], &[1.0, 3.0, 0.0], &[2.0, 0.0, 5.0]]);
        let pinv = a.pseudoinverse();
        let inv = a.inverse(None).unwrap();
        assert_close(&pinv, &inv, 1e-10);
    }

    #[test]
    fn test_pseudoinverse_tall() {
        let a = m(&[&[1.0, 1.0], &[1.0, 2.0], &[1.0, 3.0], &[1.0, 4.0]]);
        let pinv = a.pseudoinverse();
        assert_eq!(pinv.shape(), (2, 4));
        // Full column rank: pinv(A) * A = I
        let p = pinv.mat_mul(&a).unwrap();
        assert_close(&p, &Matrix::identity(2), 1e-10);
    }

    #[test]
    fn test_pseudoinverse_rank_one() {
        // pinv(A) = A' / ||A||_F^2 for rank one
        let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
        let expected = a.transpose().scale(1.0 / 25.0);
        assert_close(&a.pseudoinverse(), &expected, 1e-10);
        assert_close(&a.pseudoinverse_with_tol(1e-10), &expected, 1e-10);
    }

    #[test]
    fn test_pseudoinverse_drops_rounding_level_singular_value() {
        // Rank two; the third singular value comes back from the SVD as
        // rounding noise just above 1e-16.
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        let pinv = a.pseudoinverse();
        // Penrose conditions A * P * A = A and P * A * P = P
        let apa = a.mat_mul(&pinv).unwrap().mat_mul(&a).unwrap();
        let pap = pinv.mat_mul(&a).unwrap().mat_mul(&pinv).unwrap();
        assert_close(&apa, &a, 1e-10);
        assert_close(&pap, &pinv, 1e-10);
        // The null vector (1, -2, 1) is annihilated by P'
        let null = Vector::from([1.0, -2.0, 1.0]);
        assert!(pinv.vec_mat(&null).unwrap().norm() < 1e-10);
    }

    #[test]
    fn test_pseudoinverse_empty() {
        let pinv = Matrix::zeros(0, 3).pseudoinverse();
        assert_eq!(pinv.shape(), (3, 0));
    }

    #[test]
    fn test_positive_definite() {
        assert!(m(&[&[4.0, 1.0, 1.0], &[1.0, 3.0, 0.0], &[1.0, 0.0, 2.0]]).is_positive_definite());
        assert!(Matrix::identity(4).is_positive_definite());
        // Indefinite
        assert!(!m(&[&[1.0, 3.0], &[3.0, 1.0]]).is_positive_definite());
        // Semidefinite: second pivot is exactly zero
        assert!(!m(&[&[1.0, 1.0], &[1.0, 1.0]]).is_positive_definite());
        // Not symmetric
        assert!(!m(&[&[4.0, 1.0], &[0.0, 3.0]]).is_positive_definite());
        assert!(!Matrix::zeros(2, 3).is_positive_definite());
        assert!(!m(&[&[f64::NAN]]).is_positive_definite());
    }
}
