//! Dense symmetric linear algebra on `ndarray` matrices: Cholesky factorization,
//! triangular solves and a cyclic Jacobi eigen solver.

use std::cmp::Ordering;

use crate::error::{ClassifyError, Result};
use crate::{Matrix, Vector};

const JACOBI_MAX_SWEEPS: usize = 100;

/// Lower-triangular `L` with `a = L·Lᵀ`.
pub fn cholesky(a: &Matrix) -> Result<Matrix> {
    let n = check_square(a)?;
    let mut l = Matrix::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[j, j]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return Err(ClassifyError::SingularMatrix(format!(
                        "matrix is not positive definite (pivot {j} = {diag:e})"
                    )));
                }
                l[[j, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Ok(l)
}

/// Solves `L·x = b` for lower-triangular `L`.
pub fn solve_lower(l: &Matrix, b: &Vector) -> Vector {
    let n = b.len();
    let mut x = Vector::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * x[j]).sum();
        x[i] = (b[i] - sum) / l[[i, i]];
    }
    x
}

/// Solves `Lᵀ·x = b` for lower-triangular `L`.
pub fn solve_upper_transposed(l: &Matrix, b: &Vector) -> Vector {
    let n = b.len();
    let mut x = Vector::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (b[i] - sum) / l[[i, i]];
    }
    x
}

/// Solves `a·x = b` given the Cholesky factor of `a`.
pub fn cholesky_solve(l: &Matrix, b: &Vector) -> Vector {
    let y = solve_lower(l, b);
    solve_upper_transposed(l, &y)
}

/// `L⁻¹·b·L⁻ᵀ` for symmetric `b`, symmetrized to absorb round-off.
pub fn congruence_inverse(l: &Matrix, b: &Matrix) -> Matrix {
    let n = l.nrows();
    let mut half = Matrix::zeros((n, n));
    for (j, column) in b.columns().into_iter().enumerate() {
        half.column_mut(j).assign(&solve_lower(l, &column.to_owned()));
    }

    let mut full = Matrix::zeros((n, n));
    for (j, row) in half.rows().into_iter().enumerate() {
        full.column_mut(j).assign(&solve_lower(l, &row.to_owned()));
    }

    (&full + &full.t()) * 0.5
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns eigenvalues in descending order and the matching unit eigenvectors
/// as columns.
pub fn symmetric_eigen(a: &Matrix) -> Result<(Vector, Matrix)> {
    let n = check_square(a)?;
    let mut a = a.clone();
    let mut v = Matrix::eye(n);

    let scale = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    if scale == 0.0 {
        return Ok((Vector::zeros(n), v));
    }

    for _sweep in 0..JACOBI_MAX_SWEEPS {
        let off_diagonal: f64 = (0..n)
            .flat_map(|p| (0..n).filter(move |&q| q != p).map(move |q| (p, q)))
            .map(|(p, q)| a[[p, q]] * a[[p, q]])
            .sum();
        if off_diagonal.sqrt() <= 1e-12 * scale {
            return Ok(sorted_eigenpairs(&a, &v));
        }

        for p in 0..n {
            for q in p + 1..n {
                let apq = a[[p, q]];
                if apq.abs() <= f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                a[[p, q]] = 0.0;
                a[[q, p]] = 0.0;
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    Err(ClassifyError::NoConvergence(format!(
        "Jacobi eigen solver exceeded {JACOBI_MAX_SWEEPS} sweeps"
    )))
}

fn sorted_eigenpairs(a: &Matrix, v: &Matrix) -> (Vector, Matrix) {
    let n = a.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[j, j]].partial_cmp(&a[[i, i]]).unwrap_or(Ordering::Equal));

    let mut values = Vector::zeros(n);
    let mut vectors = Matrix::zeros((n, n));
    for (dst, &src) in order.iter().enumerate() {
        values[dst] = a[[src, src]];
        vectors.column_mut(dst).assign(&v.column(src));
    }
    (values, vectors)
}

fn check_square(a: &Matrix) -> Result<usize> {
    if a.nrows() != a.ncols() {
        return Err(ClassifyError::invalid(
            "matrix",
            format!("must be square, got {}x{}", a.nrows(), a.ncols()),
        ));
    }
    Ok(a.nrows())
}
