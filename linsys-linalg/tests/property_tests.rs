//! Property-based tests using proptest.
//!
//! Structural invariants of `Vector` and `Matrix` that hold for every
//! shape:
//!   - 1-based access rejects index 0 and size + 1
//!   - transpose is an involution
//!   - dot product is symmetric
//!   - matrix-vector product agrees with vector-matrix product on the transpose

use proptest::prelude::*;

use linsys_linalg::{LinalgError, Matrix, Vector};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn matrix_strategy(max_dim: usize) -> impl Strategy<Value = Matrix> {
    (1..=max_dim, 1..=max_dim).prop_flat_map(|(nrows, ncols)| {
        prop::collection::vec(-1e3f64..1e3, nrows * ncols)
            .prop_map(move |data| Matrix::from_row_major(nrows, ncols, data).unwrap())
    })
}

// ---------------------------------------------------------------------------
// 1. Index 0 and size + 1 are rejected
// ---------------------------------------------------------------------------
proptest! {
    #[test]
    fn prop_vector_index_bounds(n in 1usize..64) {
        let mut v = Vector::zeros(n);
        prop_assert!(v.get(1).is_ok());
        prop_assert!(v.get(n).is_ok());
        prop_assert!(
            matches!(v.get(0), Err(LinalgError::VectorIndex { index: 0, .. })),
            "index 0 accepted"
        );
        prop_assert!(
            matches!(v.get(n + 1), Err(LinalgError::VectorIndex { .. })),
            "index size + 1 accepted"
        );
        prop_assert!(v.get_mut(0).is_err());
        prop_assert!(v.set(n + 1, 1.0).is_err());
    }

    #[test]
    fn prop_matrix_index_bounds(nrows in 1usize..16, ncols in 1usize..16) {
        let mut a = Matrix::zeros(nrows, ncols);
        prop_assert!(a.get(nrows, ncols).is_ok());
        for (r, c) in [(0, 1), (1, 0), (nrows + 1, 1), (1, ncols + 1), (nrows + 1, ncols + 1)] {
            prop_assert!(
                matches!(a.get(r, c), Err(LinalgError::MatrixIndex { .. })),
                "({}, {}) accepted for {}x{}", r, c, nrows, ncols
            );
            prop_assert!(a.set(r, c, 1.0).is_err());
        }
    }
}

// ---------------------------------------------------------------------------
// 2. transpose(transpose(A)) == A
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_transpose_involution(a in matrix_strategy(8)) {
        let at = a.transpose();
        prop_assert_eq!(at.shape(), (a.ncols(), a.nrows()));
        prop_assert_eq!(at.transpose(), a);
    }

    #[test]
    fn prop_mat_vec_matches_transposed_vec_mat(a in matrix_strategy(8), seed in -1e3f64..1e3) {
        let x = Vector::from((0..a.ncols()).map(|i| seed + i as f64).collect::<Vec<f64>>());
        let ax = a.mat_vec(&x).unwrap();
        let xat = a.transpose().vec_mat(&x).unwrap();
        prop_assert_eq!(ax, xat);
    }
}

// ---------------------------------------------------------------------------
// 3. Dot product is symmetric
// ---------------------------------------------------------------------------
proptest! {
    #[test]
    fn prop_dot_symmetric(values in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..50)) {
        let (v, w): (Vec<f64>, Vec<f64>) = values.into_iter().unzip();
        let v = Vector::from(v);
        let w = Vector::from(w);
        prop_assert_eq!(v.dot(&w).unwrap(), w.dot(&v).unwrap());
    }
}
