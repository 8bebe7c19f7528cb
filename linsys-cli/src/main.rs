//! linsys: solve dense linear systems from the command line.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "linsys",
    version,
    about = "Dense linear system solvers: general, SPD and least squares",
    long_about = "Solve A * x = b by Gaussian elimination, Conjugate Gradient or\n\
                   least squares (pseudoinverse or ridge), and fit linear regressions."
)]
struct Cli {
    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log entry and exit of every matrix operation scope
    #[arg(long, global = true)]
    trace_scopes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a system given as literals
    Solve(commands::solve::SolveArgs),

    /// Fit a linear regression on a hardware performance dataset
    Regress(commands::regress::RegressArgs),

    /// Run the reference scenarios and print the results
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 | 1 if cli.trace_scopes => "debug",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let span_events = if cli.trace_scopes {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_span_events(span_events)
        .with_target(false)
        .init();

    tracing::info!("linsys v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Solve(args) => commands::solve::run(args),
        Commands::Regress(args) => commands::regress::run(args),
        Commands::Demo => commands::demo::run(),
    }
}
