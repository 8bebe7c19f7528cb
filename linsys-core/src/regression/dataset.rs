//! CSV loader for the computer hardware performance dataset.
//!
//! Each line: vendor, model, six numeric attributes, the numeric target
//! (published relative performance) and optionally a trailing numeric
//! estimate column, which is ignored.

use std::path::Path;

use anyhow::{bail, Context, Result};

use linsys_linalg::{Matrix, Vector};

/// Number of numeric feature columns per sample.
pub const N_FEATURES: usize = 6;

/// Leading identifier fields that are discarded.
const N_ID_FIELDS: usize = 2;

/// Feature rows and targets, one entry per sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<[f64; N_FEATURES]>,
    pub targets: Vec<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Feature matrix with one row per sample.
    pub fn feature_matrix(&self) -> linsys_linalg::Result<Matrix> {
        let data: Vec<f64> = self.features.iter().flat_map(|r| r.iter().copied()).collect();
        Matrix::from_row_major(self.features.len(), N_FEATURES, data)
    }

    pub fn target_vector(&self) -> Vector {
        Vector::from_slice(&self.targets)
    }

    /// Samples at the given indices, in that order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i]).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// Load a dataset file.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;
    parse_dataset(&contents).with_context(|| format!("Malformed dataset file: {}", path.display()))
}

/// Parse dataset text. Blank lines are skipped; anything else malformed is
/// an error naming the 1-based line number.
pub fn parse_dataset(contents: &str) -> Result<Dataset> {
    let mut dataset = Dataset::default();
    let min_fields = N_ID_FIELDS + N_FEATURES + 1;

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
        if fields.len() != min_fields && fields.len() != min_fields + 1 {
            bail!(
                "Line {} has {} fields (expected {} or {})",
                line_num + 1,
                fields.len(),
                min_fields,
                min_fields + 1
            );
        }

        let mut row = [0.0; N_FEATURES];
        for (k, value) in row.iter_mut().enumerate() {
            *value = parse_number(fields[N_ID_FIELDS + k], line_num + 1, "feature")?;
        }
        let target = parse_number(fields[N_ID_FIELDS + N_FEATURES], line_num + 1, "target")?;
        if let Some(extra) = fields.get(min_fields) {
            parse_number(extra, line_num + 1, "estimate")?;
        }

        dataset.features.push(row);
        dataset.targets.push(target);
    }

    if dataset.is_empty() {
        bail!("Dataset contains no samples");
    }
    Ok(dataset)
}

fn parse_number(token: &str, line: usize, what: &str) -> Result<f64> {
    let value: f64 = token
        .parse()
        .with_context(|| format!("Line {}: invalid {} value '{}'", line, what, token))?;
    if !value.is_finite() {
        bail!("Line {}: non-finite {} value '{}'", line, what, token);
    }
    Ok(value)
}
