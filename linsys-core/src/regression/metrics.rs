//! Prediction error metrics.

use linsys_linalg::{LinalgError, Result, Vector};

/// Root-mean-square error between predictions and targets.
pub fn rmse(predictions: &Vector, targets: &Vector) -> Result<f64> {
    if predictions.is_empty() {
        return Err(LinalgError::InvalidArgument(
            "cannot compute RMSE of an empty prediction set".to_string(),
        ));
    }
    let diff = predictions.sub(targets)?;
    Ok((diff.dot(&diff)? / predictions.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmse() {
        let p = Vector::from([1.0, 2.0, 3.0, 4.0]);
        let t = Vector::from([1.0, 2.0, 3.0, 6.0]);
        assert!((rmse(&p, &t).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(rmse(&p, &p).unwrap(), 0.0);
    }

    #[test]
    fn test_rmse_errors() {
        assert!(matches!(
            rmse(&Vector::zeros(2), &Vector::zeros(3)),
            Err(LinalgError::DimensionMismatch { .. })
        ));
        assert!(rmse(&Vector::zeros(0), &Vector::zeros(0)).is_err());
    }
}
