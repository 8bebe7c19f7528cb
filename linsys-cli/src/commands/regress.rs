//! Fit a linear regression on the computer hardware dataset.
//!
//! linsys regress --data machine.data --lambda 0.1 --seed 42

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use linsys_core::regression::{self, load_dataset, train_test_split};

#[derive(Args)]
pub struct RegressArgs {
    /// Dataset file (vendor, model, six features, target[, estimate])
    #[arg(long)]
    data: PathBuf,

    /// Ridge regularization (0 uses the pseudoinverse)
    #[arg(long, default_value = "0")]
    lambda: f64,

    /// Random seed for the train/test split
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Share of samples used for training
    #[arg(long, default_value = "0.8")]
    train_fraction: f64,
}

pub fn run(args: RegressArgs) -> Result<()> {
    info!("Loading dataset: {}", args.data.display());
    let dataset = load_dataset(&args.data)?;
    info!("Loaded {} samples", dataset.len());

    let (train, test) = train_test_split(&dataset, args.train_fraction, args.seed)?;
    info!(
        "Split: {} train, {} test (seed {})",
        train.len(),
        test.len(),
        args.seed
    );

    let report = regression::evaluate(&train, &test, args.lambda)
        .context("Failed to fit regression")?;

    println!("Samples: {} train, {} test", report.n_train, report.n_test);
    println!("Lambda: {}", args.lambda);
    println!("Coefficients: {}", report.coefficients);
    println!("Test RMSE: {:.4}", report.test_rmse);

    Ok(())
}
