//! Dense real-valued vector with 1-based, bounds-checked access.
//!
//! Arithmetic that can fail on a size mismatch returns a `Result`;
//! negation and scalar scaling are infallible and exposed as operators.

use std::ops::{Mul, Neg};

use crate::error::{LinalgError, Result};

/// A fixed-size vector of `f64` values.
///
/// The size is set at construction and never changes. Indices seen by
/// callers run from 1 to `len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    /// Create a vector of `size` copies of `value`.
    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            data: vec![value; size],
        }
    }

    /// Create a zero vector.
    pub fn zeros(size: usize) -> Self {
        Self::filled(size, 0.0)
    }

    /// Create a vector by copying a slice.
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            data: values.to_vec(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `index` is a valid 1-based position.
    fn in_bounds(&self, index: usize) -> bool {
        index >= 1 && index <= self.data.len()
    }

    fn offset(&self, index: usize) -> Result<usize> {
        if self.in_bounds(index) {
            Ok(index - 1)
        } else {
            Err(LinalgError::VectorIndex {
                index,
                len: self.data.len(),
            })
        }
    }

    /// Read the entry at a 1-based index.
    pub fn get(&self, index: usize) -> Result<f64> {
        let i = self.offset(index)?;
        Ok(self.data[i])
    }

    /// Mutable reference to the entry at a 1-based index.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut f64> {
        let i = self.offset(index)?;
        Ok(&mut self.data[i])
    }

    /// Overwrite the entry at a 1-based index.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    fn check_same_len(&self, other: &Vector, op: &'static str) -> Result<()> {
        if self.len() != other.len() {
            return Err(LinalgError::mismatch(
                op,
                (self.len(), 1),
                (other.len(), 1),
            ));
        }
        Ok(())
    }

    /// Element-wise addition: self + other.
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector addition")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    /// Element-wise subtraction: self - other.
    pub fn sub(&self, other: &Vector) -> Result<Vector> {
        self.check_same_len(other, "vector subtraction")?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    /// Dot product.
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_same_len(other, "dot product")?;
        Ok(dot(&self.data, &other.data))
    }

    /// Multiply every entry by `s`.
    pub fn scale(&self, s: f64) -> Vector {
        Vector {
            data: self.data.iter().map(|v| v * s).collect(),
        }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        dot(&self.data, &self.data).sqrt()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Unchecked in-place `self += alpha * other` for solver inner loops.
    pub(crate) fn axpy(&mut self, alpha: f64, other: &Vector) {
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += alpha * b;
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    fn zip_with(&self, other: &Vector, f: impl Fn(f64, f64) -> f64) -> Vector {
        Vector {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

impl From<Vec<f64>> for Vector {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(values: [f64; N]) -> Self {
        Self {
            data: values.to_vec(),
        }
    }
}

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self.scale(-1.0)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(mut self) -> Vector {
        for v in &mut self.data {
            *v = -*v;
        }
        self
    }
}

impl Mul<f64> for &Vector {
    type Output = Vector;

    fn mul(self, s: f64) -> Vector {
        self.scale(s)
    }
}

impl Mul<&Vector> for f64 {
    type Output = Vector;

    fn mul(self, v: &Vector) -> Vector {
        v.scale(self)
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}
