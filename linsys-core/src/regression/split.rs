//! Seeded train/test partitioning.

use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::dataset::Dataset;

/// Default share of samples used for training.
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Shuffle sample indices with a seeded RNG and split them into a training
/// set of `floor(train_fraction * n)` samples and a test set with the rest.
///
/// The same seed always produces the same split.
pub fn train_test_split(
    dataset: &Dataset,
    train_fraction: f64,
    seed: u64,
) -> Result<(Dataset, Dataset)> {
    let n = dataset.len();
    if n == 0 {
        bail!("Cannot split an empty dataset");
    }
    if dataset.features.len() != n {
        bail!(
            "Dataset has {} feature rows but {} targets",
            dataset.features.len(),
            n
        );
    }
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        bail!("Train fraction must lie in (0, 1), got {}", train_fraction);
    }

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let n_train = (train_fraction * n as f64).floor() as usize;
    let (train_idx, test_idx) = indices.split_at(n_train);
    Ok((dataset.select(train_idx), dataset.select(test_idx)))
}
