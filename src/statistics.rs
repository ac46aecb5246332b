//! Descriptive statistics and goodness-of-fit measures
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`stddev_and_mean`]: Population standard deviation and mean of a dataset.
//! - [`mean_deviation`]: Average absolute deviation from the mean.
//!
//! # Model Fit / Regression Diagnostics
//! - [`r_squared`]: Proportion of variance explained by a model. Higher is better (0 to 1).
//! - [`residual_sum_of_squares`]: Sum of squared differences between observed and predicted values.
//! - [`standard_error`]: Standard error of the estimate, in the units of the observed values.
//!
//! The same measures are available directly on a [`Series`]:
//! [`Series::st_dev`], [`Series::mean_dev`], [`Series::coefficient_of_determination`]
//! and [`Series::standard_error`].
//!
//! # Examples
//!
//! ```rust
//! use seriesfit::statistics::r_squared;
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//!
//! let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
//! assert!(r2 > 0.9);
//! ```
use crate::{
    error::{Error, Result},
    Series,
};

/// Computes the arithmetic mean of a sequence of values.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// Mean = (Σ x_i) / N
/// ```
/// </div>
///
/// # Returns
/// The arithmetic mean of all elements in `data`, or NaN if `data` is empty.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// assert_eq!(seriesfit::statistics::mean(values.into_iter()), 2.0);
/// ```
pub fn mean(data: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0.0;
    for value in data {
        sum += value;
        count += 1.0;
    }
    sum / count
}

/// Computes the standard deviation of a sequence of values.
/// - Uses the population formula (divides by `N`) rather than `N-1`.
///
/// This function also returns the mean, for performance reasons.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// σ = sqrt( (Σ (x_i - Mean)²) / N )
/// ```
/// </div>
///
/// # Returns
/// `(standard deviation, mean)`. Both are NaN if `data` is empty.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let (s, _) = seriesfit::statistics::stddev_and_mean(values.into_iter());
/// assert_eq!(s, 0.816496580927726); // sqrt(2/3)
/// ```
pub fn stddev_and_mean(data: impl Iterator<Item = f64>) -> (f64, f64) {
    let data: Vec<_> = data.collect();
    let mean = mean(data.iter().copied());
    let sum_sq_diff: f64 = data.iter().map(|v| (v - mean).powi(2)).sum();
    let dev = (sum_sq_diff / data.len() as f64).sqrt();

    (dev, mean)
}

/// Computes the mean absolute deviation of a sequence of values around a known mean.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// MeanDev = (Σ |x_i - Mean|) / N
/// ```
/// </div>
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 6.0];
/// let md = seriesfit::statistics::mean_deviation(values.into_iter(), 3.0);
/// assert_eq!(md, 2.0);
/// ```
pub fn mean_deviation(data: impl Iterator<Item = f64>, mean: f64) -> f64 {
    let mut total = 0.0;
    let mut n = 0.0;
    for value in data {
        total += (value - mean).abs();
        n += 1.0;
    }
    total / n
}

/// Computes the residual sum of squares between observed and predicted values.
///
/// ```math
/// SS_res = Σ (y_i - y_fit_i)²
/// ```
pub fn residual_sum_of_squares(
    y: impl Iterator<Item = f64>,
    y_fit: impl Iterator<Item = f64>,
) -> f64 {
    y.zip(y_fit).map(|(y, y_fit)| (y - y_fit).powi(2)).sum()
}

/// Calculate the R-squared value for a set of data.
///
/// R-squared is a number between 0 and 1 that tells you how well the model explains the data:
/// - `0` means the model explains none of the variation.
/// - `1` means the model explains all the variation.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// R² = 1 - (SS_res / SS_tot)
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
/// </div>
///
/// A constant `y` has `SS_tot = 0`; the result is then NaN (or -∞), and is not masked.
pub fn r_squared(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let y: Vec<f64> = y.collect();
    let y_fit: Vec<f64> = y_fit.collect();
    let y_mean = mean(y.iter().copied());

    let mut ss_total = 0.0;
    let mut ss_residual = 0.0;
    for (y, y_fit) in y.into_iter().zip(y_fit) {
        ss_total += (y - y_mean).powi(2);
        ss_residual += (y - y_fit).powi(2);
    }

    1.0 - (ss_residual / ss_total)
}

/// Computes the standard error of the estimate for a two-parameter model.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// SE = sqrt( Σ (y_i - y_fit_i)² / (n - 2) )
/// ```
/// </div>
pub fn standard_error(y: impl Iterator<Item = f64>, y_fit: impl Iterator<Item = f64>) -> f64 {
    let mut total = 0.0;
    let mut n = 0.0;
    for (y, y_fit) in y.zip(y_fit) {
        total += (y - y_fit).powi(2);
        n += 1.0;
    }
    (total / (n - 2.0)).sqrt()
}

impl Series {
    /// Population standard deviation of the y values, or 0 if empty.
    #[must_use]
    pub fn st_dev(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.y().iter().map(|y| (y - self.mean()).powi(2)).sum();
        (sum_sq / self.len() as f64).sqrt()
    }

    /// Mean absolute deviation of the y values around the mean, or 0 if empty.
    #[must_use]
    pub fn mean_dev(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        mean_deviation(self.y().iter().copied(), self.mean())
    }

    fn check_predicted(&self, predicted: &Series) -> Result<()> {
        if predicted.len() != self.len() {
            return Err(Error::InvalidInput(format!(
                "predicted series has {} samples, expected {}",
                predicted.len(),
                self.len()
            )));
        }
        if self.is_empty() {
            return Err(Error::NoData);
        }
        Ok(())
    }

    /// Coefficient of determination (R²) of `predicted` against this series.
    ///
    /// Samples are paired by position. See [`r_squared`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the lengths differ, or [`Error::NoData`] if empty.
    pub fn coefficient_of_determination(&self, predicted: &Series) -> Result<f64> {
        self.check_predicted(predicted)?;
        Ok(r_squared(
            self.y().iter().copied(),
            predicted.y().iter().copied(),
        ))
    }

    /// Standard error of `predicted` against this series.
    ///
    /// Samples are paired by position. See [`standard_error`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the lengths differ, or [`Error::NoData`] if empty.
    pub fn standard_error(&self, predicted: &Series) -> Result<f64> {
        self.check_predicted(predicted)?;
        Ok(standard_error(
            self.y().iter().copied(),
            predicted.y().iter().copied(),
        ))
    }
}
