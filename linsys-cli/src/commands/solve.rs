//! Solve a linear system given on the command line.
//!
//! linsys solve --matrix "2,-1,0;-1,2,-1;0,-1,2" --rhs "1,0,1" --strategy auto

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use linsys_core::{residual, LinearSystem, SolveStrategy};
use linsys_linalg::{CgConfig, Matrix, Vector};

#[derive(Args)]
pub struct SolveArgs {
    /// Coefficient matrix: rows separated by ';', entries by ',' or spaces
    #[arg(long)]
    matrix: String,

    /// Right-hand side entries, comma-separated
    #[arg(long)]
    rhs: String,

    /// Strategy: auto, general, spd, or lsq
    #[arg(long, default_value = "auto")]
    strategy: String,

    /// Ridge regularization for the least-squares strategy
    #[arg(long, default_value = "0")]
    lambda: f64,

    /// Conjugate Gradient convergence tolerance
    #[arg(long, default_value = "1e-10")]
    cg_tol: f64,

    /// Conjugate Gradient iteration cap (default: max(100, 10 * n))
    #[arg(long)]
    cg_max_iter: Option<usize>,
}

pub fn run(args: SolveArgs) -> Result<()> {
    let a = parse_matrix(&args.matrix)?.with_name("A");
    let b = Vector::from(parse_values(&args.rhs).context("Invalid --rhs")?);
    info!("Parsed {}x{} system", a.nrows(), a.ncols());

    let strategy = match args.strategy.as_str() {
        "auto" => choose_strategy(&a, args.lambda),
        "general" => SolveStrategy::General,
        "spd" => SolveStrategy::SymmetricPositiveDefinite,
        "lsq" => SolveStrategy::LeastSquares {
            lambda: args.lambda,
        },
        other => bail!(
            "Unknown strategy: {} (expected auto, general, spd, or lsq)",
            other
        ),
    };
    info!("Strategy: {}", strategy);

    let cg = CgConfig {
        tol: args.cg_tol,
        max_iter: args.cg_max_iter,
    };
    let x = LinearSystem::with_strategy(&a, &b, strategy)?
        .with_cg_config(cg)
        .solve()
        .with_context(|| format!("Failed to solve with strategy: {}", strategy))?;

    let r = residual(&a, &x, &b)?;
    println!("Strategy: {}", strategy);
    println!("x = {}", x);
    println!("||b - A x|| = {:.3e}", r.norm());

    Ok(())
}

/// SPD if positive definite, general if square, least squares otherwise.
fn choose_strategy(a: &Matrix, lambda: f64) -> SolveStrategy {
    if lambda > 0.0 || !a.is_square() {
        SolveStrategy::LeastSquares { lambda }
    } else if a.is_positive_definite() {
        SolveStrategy::SymmetricPositiveDefinite
    } else {
        SolveStrategy::General
    }
}

fn parse_matrix(text: &str) -> Result<Matrix> {
    let rows = text
        .split(';')
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .enumerate()
        .map(|(i, row)| parse_values(row).with_context(|| format!("Invalid --matrix row {}", i + 1)))
        .collect::<Result<Vec<_>>>()?;
    if rows.is_empty() {
        bail!("--matrix has no rows");
    }
    Ok(Matrix::from_rows(&rows)?)
}

fn parse_values(text: &str) -> Result<Vec<f64>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<f64>()
                .with_context(|| format!("Invalid number: '{}'", tok))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matrix() {
        let a = parse_matrix("1, 2; 3 4 ;").unwrap();
        assert_eq!(a, Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap());
        assert!(parse_matrix("1,2;3").is_err());
        assert!(parse_matrix("1,x").is_err());
        assert!(parse_matrix(" ; ").is_err());
    }

    #[test]
    fn test_choose_strategy() {
        let spd = Matrix::from_rows(&[[4.0, 1.0], [1.0, 3.0]]).unwrap();
        let general = Matrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let tall = Matrix::zeros(3, 2);
        assert_eq!(
            choose_strategy(&spd, 0.0),
            SolveStrategy::SymmetricPositiveDefinite
        );
        assert_eq!(choose_strategy(&general, 0.0), SolveStrategy::General);
        assert_eq!(
            choose_strategy(&tall, 0.0),
            SolveStrategy::LeastSquares { lambda: 0.0 }
        );
        assert_eq!(
            choose_strategy(&spd, 0.5),
            SolveStrategy::LeastSquares { lambda: 0.5 }
        );
    }
}
