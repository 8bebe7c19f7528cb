#![allow(clippy::needless_range_loop)]
//! Dense matrix storage and arithmetic.
//!
//! Row-major `Vec<f64>` storage with 1-based, bounds-checked element
//! access for callers. Conversions to and from faer's `Mat<f64>` are the
//! only bridge to the external numerical library (used for SVD).

use std::ops::Mul;

use faer::Mat;

use crate::error::{LinalgError, Result};
use crate::vector::Vector;

/// Entries with a smaller magnitude are printed as 0.
pub const DISPLAY_ZERO_TOL: f64 = 1e-12;

/// Absolute tolerance for `is_symmetric`, scaled up for large entries.
pub const SYMMETRY_TOL: f64 = 1e-10;

/// A dense, fixed-shape matrix of `f64` values.
///
/// The optional name is purely diagnostic: it shows up in error messages
/// and in trace spans, never in arithmetic.
#[derive(Debug, Clone)]
pub struct Matrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
    name: Option<String>,
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows && self.ncols == other.ncols && self.data == other.data
    }
}

impl Matrix {
    /// Create a new matrix filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![0.0; nrows * ncols],
            name: None,
        }
    }

    /// Create an identity matrix of size n x n.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Create a matrix from nested rows. Every row must have the length of
    /// the first one.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(LinalgError::Shape {
                    row: i + 1,
                    expected: ncols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            nrows,
            ncols,
            data,
            name: None,
        })
    }

    /// Create a matrix from a flat row-major buffer.
    pub fn from_row_major(nrows: usize, ncols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != nrows * ncols {
            return Err(LinalgError::Shape {
                row: 0,
                expected: nrows * ncols,
                got: data.len(),
            });
        }
        Ok(Self {
            nrows,
            ncols,
            data,
            name: None,
        })
    }

    /// Attach a diagnostic name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name used in error messages and trace spans.
    pub(crate) fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row < 1 || row > self.nrows || col < 1 || col > self.ncols {
            return Err(LinalgError::MatrixIndex {
                row,
                col,
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        Ok((row - 1) * self.ncols + (col - 1))
    }

    /// Element at 1-based (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let k = self.offset(row, col)?;
        Ok(self.data[k])
    }

    /// Mutable reference to the element at 1-based (row, col).
    pub fn get_mut(&mut self, row: usize, col: usize) -> Result<&mut f64> {
        let k = self.offset(row, col)?;
        Ok(&mut self.data[k])
    }

    /// Set the element at 1-based (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        *self.get_mut(row, col)? = value;
        Ok(())
    }

    // 0-based accessors for the algorithms in this crate; callers have
    // already validated the shape.
    #[inline]
    pub(crate) fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.ncols + j]
    }

    #[inline]
    pub(crate) fn at_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.data[i * self.ncols + j]
    }

    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let n = self.ncols;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * n);
        head[lo * n..(lo + 1) * n].swap_with_slice(&mut tail[..n]);
    }

    /// Row as a Vector (1-based).
    pub fn row(&self, row: usize) -> Result<Vector> {
        if row < 1 || row > self.nrows {
            return Err(LinalgError::MatrixIndex {
                row,
                col: 1,
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        let start = (row - 1) * self.ncols;
        Ok(Vector::from_slice(&self.data[start..start + self.ncols]))
    }

    /// Column as a Vector (1-based).
    pub fn col(&self, col: usize) -> Result<Vector> {
        if col < 1 || col > self.ncols {
            return Err(LinalgError::MatrixIndex {
                row: 1,
                col,
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        Ok(Vector::from(
            (0..self.nrows).map(|i| self.at(i, col - 1)).collect::<Vec<_>>(),
        ))
    }

    /// Main diagonal.
    pub fn diag(&self) -> Vector {
        let n = self.nrows.min(self.ncols);
        Vector::from((0..n).map(|i| self.at(i, i)).collect::<Vec<_>>())
    }

    fn check_same_shape(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(LinalgError::mismatch(op, self.shape(), other.shape()));
        }
        Ok(())
    }

    /// Element-wise addition: self + other.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix addition")?;
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            nrows: self.nrows,
            ncols: self.ncols,
            data,
            name: None,
        })
    }

    /// Element-wise subtraction: self - other.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other, "matrix subtraction")?;
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a - b)
            .collect();
        Ok(Matrix {
            nrows: self.nrows,
            ncols: self.ncols,
            data,
            name: None,
        })
    }

    /// Scalar multiplication.
    pub fn scale(&self, s: f64) -> Matrix {
        Matrix {
            nrows: self.nrows,
            ncols: self.ncols,
            data: self.data.iter().map(|v| v * s).collect(),
            name: None,
        }
    }

    /// Matrix-matrix product: self * other.
    pub fn mat_mul(&self, other: &Matrix) -> Result<Matrix> {
        if self.ncols != other.nrows {
            return Err(LinalgError::mismatch(
                "matrix product",
                self.shape(),
                other.shape(),
            ));
        }
        let mut result = Matrix::zeros(self.nrows, other.ncols);
        for i in 0..self.nrows {
            for k in 0..self.ncols {
                let aik = self.at(i, k);
                for j in 0..other.ncols {
                    *result.at_mut(i, j) += aik * other.at(k, j);
                }
            }
        }
        Ok(result)
    }

    /// Matrix-vector product: self * v.
    pub fn mat_vec(&self, v: &Vector) -> Result<Vector> {
        if self.ncols != v.len() {
            return Err(LinalgError::mismatch(
                "matrix-vector product",
                self.shape(),
                (v.len(), 1),
            ));
        }
        Ok(self.mat_vec_unchecked(v))
    }

    pub(crate) fn mat_vec_unchecked(&self, v: &Vector) -> Vector {
        let x = v.as_slice();
        let result: Vec<f64> = (0..self.nrows)
            .map(|i| {
                let row = &self.data[i * self.ncols..(i + 1) * self.ncols];
                crate::vector::dot(row, x)
            })
            .collect();
        Vector::from(result)
    }

    /// Vector-matrix product: v' * self, returned as a vector of length ncols.
    pub fn vec_mat(&self, v: &Vector) -> Result<Vector> {
        if self.nrows != v.len() {
            return Err(LinalgError::mismatch(
                "vector-matrix product",
                (1, v.len()),
                self.shape(),
            ));
        }
        let mut result = vec![0.0; self.ncols];
        for (i, &vi) in v.iter().enumerate() {
            for j in 0..self.ncols {
                result[j] += vi * self.at(i, j);
            }
        }
        Ok(Vector::from(result))
    }

    /// Transpose. A 1x1 matrix is returned as a plain copy.
    pub fn transpose(&self) -> Matrix {
        let _scope = tracing::debug_span!(
            "matrix.transpose",
            matrix = self.label(),
            rows = self.nrows,
            cols = self.ncols
        )
        .entered();
        if self.shape() == (1, 1) {
            return self.clone();
        }
        let mut result = Matrix::zeros(self.ncols, self.nrows);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                *result.at_mut(j, i) = self.at(i, j);
            }
        }
        result.name = self.name.as_ref().map(|n| format!("{}^T", n));
        result
    }

    /// Compute A' * A (the Gram matrix of the columns).
    pub fn gram(&self) -> Matrix {
        let p = self.ncols;
        let mut result = Matrix::zeros(p, p);
        for j in 0..p {
            for k in j..p {
                let mut s = 0.0;
                for i in 0..self.nrows {
                    s += self.at(i, j) * self.at(i, k);
                }
                *result.at_mut(j, k) = s;
                *result.at_mut(k, j) = s;
            }
        }
        result
    }

    /// True iff square and M(i,j) == M(j,i) within `SYMMETRY_TOL`.
    pub fn is_symmetric(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        for i in 0..self.nrows {
            for j in (i + 1)..self.ncols {
                let a = self.at(i, j);
                let b = self.at(j, i);
                let scale = a.abs().max(b.abs()).max(1.0);
                if (a - b).abs() > SYMMETRY_TOL * scale {
                    return false;
                }
            }
        }
        true
    }

    /// Copy into a faer matrix.
    pub fn to_faer(&self) -> Mat<f64> {
        Mat::from_fn(self.nrows, self.ncols, |i, j| self.at(i, j))
    }

    /// Copy out of a faer matrix.
    pub fn from_faer(mat: &Mat<f64>) -> Self {
        let (nrows, ncols) = (mat.nrows(), mat.ncols());
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(mat.read(i, j));
            }
        }
        Self {
            nrows,
            ncols,
            data,
            name: None,
        }
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, s: f64) -> Matrix {
        self.scale(s)
    }
}

impl Mul<&Matrix> for f64 {
    type Output = Matrix;

    fn mul(self, m: &Matrix) -> Matrix {
        m.scale(self)
    }
}

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                if j > 0 {
                    write!(f, " ")?;
                }
                let v = self.at(i, j);
                let v = if v.abs() < DISPLAY_ZERO_TOL { 0.0 } else { v };
                write!(f, "{}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
