//! Locally weighted linear regression (LOESS)
//!
//! Smooths a [`Series`] by fitting, around every distinct x value, a straight line to the
//! nearest samples, weighted by their distance with the [`tricube`] kernel.
//!
//! # Example
//! ```
//! # use seriesfit::Series;
//! let data = Series::from_fn(0.0..=20.0, 1.0, |x| 0.5 * x + if x as i64 % 2 == 0 { 1.0 } else { -1.0 });
//! let smooth = data.loess(0.5).unwrap();
//!
//! assert_eq!(smooth.len(), data.len());
//! assert!(smooth.max() - smooth.min() < data.max() - data.min());
//! ```
use crate::{
    error::{Error, Result},
    Series,
};

/// Tricube weighting kernel: `(1 - |u|³)³` for `|u| < 1`, and 0 beyond.
///
/// # Example
/// ```
/// # use seriesfit::loess::tricube;
/// assert_eq!(tricube(0.0), 1.0);
/// assert_eq!(tricube(1.0), 0.0);
/// assert_eq!(tricube(-2.0), 0.0);
/// ```
#[must_use]
pub fn tricube(u: f64) -> f64 {
    let u = u.abs();
    if u >= 1.0 {
        0.0
    } else {
        (1.0 - u * u * u).powi(3)
    }
}

/// Returns the distinct values of a non-decreasing slice, in order.
#[must_use]
pub fn distinct_values(sorted: &[f64]) -> Vec<f64> {
    let mut values = sorted.to_vec();
    values.dedup();
    values
}

/// Weighted linear regression of the window around `query`, evaluated at `query`.
///
/// x values are centered on the query, so the result is the intercept of the local line.
fn local_estimate(x: &[f64], y: &[f64], query: f64) -> f64 {
    let edge = x
        .iter()
        .fold(0.0f64, |acc, &x| acc.max((x - query).abs()));

    let weight = |x: f64| {
        if edge > 0.0 {
            tricube((x - query) / edge)
        } else {
            1.0
        }
    };

    let (mut sw, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&xk, &yk) in x.iter().zip(y) {
        let w = weight(xk);
        let dx = xk - query;
        sw += w;
        sx += w * dx;
        sy += w * yk;
        sxx += w * dx * dx;
        sxy += w * dx * yk;
    }

    if sw == 0.0 {
        // Only reachable with NaN distances; fall back to an unweighted mean
        return y.iter().sum::<f64>() / y.len() as f64;
    }

    let (mean_x, mean_y) = (sx / sw, sy / sw);
    let variance = sxx / sw - mean_x * mean_x;
    let slope = if variance > 0.0 {
        (sxy / sw - mean_x * mean_y) / variance
    } else {
        0.0
    };

    mean_y - slope * mean_x
}

impl Series {
    /// Smooths the series with locally weighted linear regression.
    ///
    /// Produces one output sample per distinct x value.
    ///
    /// - `bandwidth` is the fraction of the samples used for each local fit, in `(0, 1]`.
    ///   If it would cover fewer than 2 distinct x values it is raised to 1.
    /// - For each query, the window of `max(2, floor(bandwidth·n))` samples slides right while
    ///   the next sample is closer to the query than the leftmost one. The window is never
    ///   rebuilt from scratch, so consecutive queries cost O(window).
    /// - Samples are weighted by [`tricube`] of their distance over the distance to the
    ///   farthest sample in the window.
    /// - If every sample in a window has the same x, the local slope is 0.
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::InvalidInput`] if `bandwidth` is not in `(0, 1]`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn loess(&self, bandwidth: f64) -> Result<Series> {
        if !(bandwidth > 0.0 && bandwidth <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "bandwidth must be in (0, 1], got {bandwidth}"
            )));
        }
        if self.is_empty() {
            return Err(Error::NoData);
        }

        let queries = distinct_values(self.x());
        let mut bandwidth = bandwidth;
        if 2.0 / queries.len() as f64 > bandwidth {
            log::debug!(
                "bandwidth {bandwidth} covers fewer than 2 of {} distinct x values; using 1.0",
                queries.len()
            );
            bandwidth = 1.0;
        }

        let (x, y) = (self.x(), self.y());
        let n = x.len();
        let span = ((bandwidth * n as f64).floor() as usize).clamp(2.min(n), n);

        let mut left = 0;
        let mut right = span - 1;
        let mut smoothed = Vec::with_capacity(queries.len());
        for &query in &queries {
            while right + 1 < n && x[right + 1] - query < query - x[left] {
                left += 1;
                right += 1;
            }

            smoothed.push(local_estimate(
                &x[left..=right],
                &y[left..=right],
                query,
            ));
        }

        Ok(Series::from_validated(queries, smoothed))
    }
}
