//! Dense linear solver for the normal equations of polynomial least squares
//!
//! Gaussian elimination with partial pivoting over an augmented matrix `[A | b]`.
//! Both the rows below and above each pivot are eliminated, so once every column has
//! been processed the system is diagonal and each unknown is read off directly.
use nalgebra::{DMatrix, DVector};

use crate::error::{Error, Result};

/// Solves the square system described by an augmented `k x (k + 1)` matrix.
///
/// The last column holds the right-hand side.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// For each column, the remaining row with the largest absolute entry in that column is
/// swapped into the pivot position. A pivot is treated as zero if
///
/// ```math
/// |p| <= ε · k · max|a_ij|
/// ```
///
/// where `ε` is the machine epsilon and the maximum is taken over the coefficient part of the
/// input. This catches exactly singular systems as well as systems that are singular up to
/// rounding, which would otherwise produce huge or non-finite coefficients.
/// </div>
///
/// # Errors
/// - [`Error::InvalidInput`] if the matrix is not `k x (k + 1)` with `k >= 1`.
/// - [`Error::SingularMatrix`] if a pivot is (numerically) zero. `n` and `k` are both the
///   number of unknowns; callers with more context may replace `n`.
///
/// # Example
/// ```
/// # use seriesfit::{solver::solve_augmented, nalgebra::DMatrix};
/// // x + y = 3, x - y = 1
/// let system = DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 3.0, 1.0, -1.0, 1.0]);
/// let solution = solve_augmented(system).unwrap();
/// assert_eq!(solution.as_slice(), &[2.0, 1.0]);
/// ```
pub fn solve_augmented(mut augmented: DMatrix<f64>) -> Result<DVector<f64>> {
    let (k, cols) = augmented.shape();
    if k == 0 || cols != k + 1 {
        return Err(Error::InvalidInput(format!(
            "expected a k x (k + 1) augmented matrix, got {k} x {cols}"
        )));
    }

    let scale = augmented
        .columns(0, k)
        .iter()
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    let tolerance = f64::EPSILON * k as f64 * scale;
    let singular = || Error::SingularMatrix { n: k, k };

    for col in 0..k {
        // Partial pivoting
        let mut pivot_row = col;
        let mut pivot_mag = augmented[(col, col)].abs();
        for row in col + 1..k {
            let mag = augmented[(row, col)].abs();
            if mag > pivot_mag {
                pivot_row = row;
                pivot_mag = mag;
            }
        }

        if pivot_mag <= tolerance || pivot_mag.is_nan() {
            return Err(singular());
        }
        if pivot_row != col {
            augmented.swap_rows(pivot_row, col);
        }

        let pivot = augmented[(col, col)];
        for row in 0..k {
            if row == col {
                continue;
            }

            let factor = augmented[(row, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..cols {
                augmented[(row, c)] -= factor * augmented[(col, c)];
            }
        }
    }

    let solution = DVector::from_fn(k, |i, _| augmented[(i, k)] / augmented[(i, i)]);
    if solution.iter().any(|v| !v.is_finite()) {
        return Err(singular());
    }

    Ok(solution)
}

/// Solves `A·x = b` for a square `A`.
///
/// Convenience wrapper around [`solve_augmented`].
///
/// # Errors
/// See [`solve_augmented`]. Also returns [`Error::InvalidInput`] if `b` does not have one row per row of `A`.
pub fn solve(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    if a.nrows() != b.nrows() {
        return Err(Error::InvalidInput(format!(
            "right-hand side has {} rows, expected {}",
            b.nrows(),
            a.nrows()
        )));
    }

    let mut augmented = a.clone().insert_column(a.ncols(), 0.0);
    augmented.set_column(a.ncols(), b);
    solve_augmented(augmented)
}
