//! Linear regression on top of the least-squares system.
//!
//! Load a dataset, split it with an explicit seed, fit coefficients with
//! `LinearSystem::least_squares` and score predictions by RMSE.

pub mod dataset;
pub mod metrics;
pub mod split;

use linsys_linalg::{Matrix, Result, Vector};
use tracing::debug;

use crate::system::LinearSystem;

pub use dataset::{load_dataset, parse_dataset, Dataset};
pub use metrics::rmse;
pub use split::train_test_split;

/// Fit linear coefficients (no intercept column is added).
///
/// `lambda == 0` gives the minimum-norm least-squares solution; `lambda > 0`
/// applies ridge regularization.
pub fn fit(train: &Dataset, lambda: f64) -> Result<Vector> {
    let x = train.feature_matrix()?.with_name("features");
    let y = train.target_vector();
    debug!("Fitting {} samples x {} features (lambda = {})", x.nrows(), x.ncols(), lambda);
    LinearSystem::least_squares(&x, &y, lambda)?.solve()
}

/// Predictions `X * coefficients`.
pub fn predict(features: &Matrix, coefficients: &Vector) -> Result<Vector> {
    features.mat_vec(coefficients)
}

/// Coefficients and held-out error of one train/test run.
#[derive(Debug, Clone)]
pub struct RegressionReport {
    pub coefficients: Vector,
    pub test_rmse: f64,
    pub n_train: usize,
    pub n_test: usize,
}

/// Fit on `train` and score on `test`.
pub fn evaluate(train: &Dataset, test: &Dataset, lambda: f64) -> Result<RegressionReport> {
    let coefficients = fit(train, lambda)?;
    let predictions = predict(&test.feature_matrix()?, &coefficients)?;
    let test_rmse = rmse(&predictions, &test.target_vector())?;
    Ok(RegressionReport {
        coefficients,
        test_rmse,
        n_train: train.len(),
        n_test: test.len(),
    })
}
