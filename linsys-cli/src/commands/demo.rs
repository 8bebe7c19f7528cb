//! Run the reference systems through every strategy.
//!
//! linsys demo

use anyhow::Result;
use tracing::info;

use linsys_core::{residual, LinearSystem};
use linsys_linalg::{Matrix, Vector};

pub fn run() -> Result<()> {
    general()?;
    spd()?;
    least_squares()?;
    inverse()?;
    Ok(())
}

fn general() -> Result<()> {
    info!("Demo: general system");
    let a = Matrix::from_rows(&[[2.0, -1.0, 0.0], [-1.0, 2.0, -1.0], [0.0, -1.0, 2.0]])?
        .with_name("A");
    let b = Vector::from([1.0, 0.0, 1.0]);
    let x = LinearSystem::general(&a, &b)?.solve()?;

    println!("== General system (Gaussian elimination) ==");
    print!("A =\n{}", a);
    println!("b = {}", b);
    println!("x = {}", x);
    println!("det(A) = {}", a.det()?);
    println!("||b - A x|| = {:.3e}", residual(&a, &x, &b)?.norm());
    println!();
    Ok(())
}

fn spd() -> Result<()> {
    info!("Demo: symmetric positive definite system");
    let a = Matrix::from_rows(&[[4.0, 1.0, 1.0], [1.0, 3.0, 0.0], [1.0, 0.0, 2.0]])?
        .with_name("S");
    let b = Vector::from([1.0, 2.0, 3.0]);
    let x = LinearSystem::symmetric_positive_definite(&a, &b)?.solve()?;
    let direct = a.solve(&b)?;

    println!("== SPD system (Conjugate Gradient) ==");
    print!("A =\n{}", a);
    println!("b = {}", b);
    println!("x (cg)     = {}", x);
    println!("x (direct) = {}", direct);
    println!();
    Ok(())
}

fn least_squares() -> Result<()> {
    info!("Demo: least squares system");
    let a = Matrix::from_rows(&[[1.0, 1.0], [1.0, 2.0], [1.0, 3.0], [1.0, 4.0]])?
        .with_name("X");
    let b = Vector::from([6.0, 5.0, 7.0, 10.0]);
    let x = LinearSystem::least_squares(&a, &b, 0.0)?.solve()?;
    let ridge = LinearSystem::least_squares(&a, &b, 1.0)?.solve()?;
    let normal = a.gram().solve(&a.vec_mat(&b)?)?;

    println!("== Least squares system ==");
    print!("A =\n{}", a);
    println!("b = {}", b);
    println!("x (pseudoinverse) = {}", x);
    println!("x (normal eqs)    = {}", normal);
    println!("x (ridge, 1)      = {}", ridge);
    println!();
    Ok(())
}

fn inverse() -> Result<()> {
    info!("Demo: inverse");
    let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?.with_name("M");
    let inv = a.inverse(Some("M^-1"))?;

    println!("== Inverse ==");
    print!("A =\n{}", a);
    print!("A^-1 =\n{}", inv);
    print!("A * A^-1 =\n{}", a.mat_mul(&inv)?);
    Ok(())
}
