//! Trend detection and noise reduction
//!
//! Operators that look at the direction of the y column rather than its level:
//! - [`Series::trend_changes`] and [`Series::recent_trends`] locate peaks and troughs.
//! - [`Series::smoother`] and [`Series::quantize`] remove small-scale noise.
//! - [`Series::itrend`] is Ehlers' instantaneous trendline, a low-lag digital filter.
use std::cmp::Ordering;

use crate::{
    error::{Error, Result},
    Series,
};

/// Direction of the step from `a` to `b`. Ties and NaNs have no direction.
fn direction(a: f64, b: f64) -> Option<Ordering> {
    match b.partial_cmp(&a) {
        Some(Ordering::Equal) | None => None,
        ordering => ordering,
    }
}

impl Series {
    /// Returns the samples at which the y column reverses direction (peaks and troughs).
    ///
    /// Consecutive differences are compared in a single pass. Equal consecutive values do not
    /// start or end a run, so the last sample of a plateau is reported as the turning point.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::Series;
    /// let data = Series::from_arrays(
    ///     vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
    ///     vec![1.0, 3.0, 2.0, 2.0, 5.0, 6.0],
    /// ).unwrap();
    ///
    /// let changes = data.trend_changes();
    /// assert_eq!(changes.x(), &[1.0, 3.0]);
    /// ```
    #[must_use]
    pub fn trend_changes(&self) -> Series {
        let (x, y) = (self.x(), self.y());
        let mut changes_x = Vec::new();
        let mut changes_y = Vec::new();

        let mut current = None;
        for i in 1..y.len() {
            let Some(step) = direction(y[i - 1], y[i]) else {
                continue;
            };

            if current.is_some_and(|c| c != step) {
                changes_x.push(x[i - 1]);
                changes_y.push(y[i - 1]);
            }
            current = Some(step);
        }

        Series::from_validated(changes_x, changes_y)
    }

    /// Splits the series into its last `n` monotone runs, most recent first.
    ///
    /// Walks backwards from the last sample. Consecutive runs share their turning point, so
    /// each run spans a full leg from trough to peak (or peak to trough). Ties extend the
    /// current run. The oldest run returned may be cut short if `n` runs were found before
    /// reaching the first sample.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::Series;
    /// let data = Series::from_fn(0.0..=5.0, 1.0, |x| [1.0, 2.0, 3.0, 2.0, 1.0, 2.0][x as usize]);
    /// let runs = data.recent_trends(3);
    ///
    /// assert_eq!(runs.len(), 3);
    /// assert_eq!(runs[0].y(), &[1.0, 2.0]);
    /// assert_eq!(runs[1].y(), &[3.0, 2.0, 1.0]);
    /// assert_eq!(runs[2].y(), &[1.0, 2.0, 3.0]);
    /// ```
    #[must_use]
    pub fn recent_trends(&self, n: usize) -> Vec<Series> {
        let (x, y) = (self.x(), self.y());
        let run = |start: usize, end: usize| {
            Series::from_validated(x[start..end].to_vec(), y[start..end].to_vec())
        };

        let mut runs = Vec::new();
        if n == 0 || self.is_empty() {
            return runs;
        }

        let mut end = y.len();
        let mut current = None;
        for i in (0..y.len() - 1).rev() {
            let Some(step) = direction(y[i], y[i + 1]) else {
                continue;
            };

            if current.is_some_and(|c| c != step) {
                // i + 1 is the turning point
                runs.push(run(i + 1, end));
                if runs.len() == n {
                    return runs;
                }
                end = i + 2;
            }
            current = Some(step);
        }

        runs.push(run(0, end));
        runs
    }

    /// Iterative noise removal: each pass replaces every interior y value with the mean of
    /// its two neighbours from the previous pass.
    ///
    /// The first and last samples are never changed. With 0 passes, or fewer than 3 samples,
    /// the result is a copy.
    #[must_use]
    pub fn smoother(&self, passes: usize) -> Series {
        let mut y = self.y().to_vec();
        if y.len() >= 3 {
            let mut previous = y.clone();
            for _ in 0..passes {
                previous.copy_from_slice(&y);
                for i in 1..y.len() - 1 {
                    y[i] = (previous[i - 1] + previous[i + 1]) / 2.0;
                }
            }
        }

        Series::from_validated(self.x().to_vec(), y)
    }

    /// Domain reduction: snaps every y value to the nearest of `grid` equal steps between
    /// [`Series::min`] and [`Series::max`].
    ///
    /// A constant or empty series has nothing to snap, and is returned as a copy.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `grid` is 0.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::Series;
    /// let data = Series::from_arrays(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 2.4, 2.6, 10.0]).unwrap();
    /// let snapped = data.quantize(2).unwrap();
    /// assert_eq!(snapped.y(), &[0.0, 0.0, 5.0, 10.0]);
    /// ```
    pub fn quantize(&self, grid: usize) -> Result<Series> {
        if grid == 0 {
            return Err(Error::invalid_input("quantization grid must have at least 1 step"));
        }

        let (min, max) = (self.min(), self.max());
        let tile = (max - min) / grid as f64;
        if self.is_empty() || !(tile > 0.0) || !tile.is_finite() {
            return Ok(self.clone());
        }

        let y = self
            .y()
            .iter()
            .map(|&y| min + ((y - min) / tile).round() * tile)
            .collect();
        Ok(Series::from_validated(self.x().to_vec(), y))
    }

    /// Ehlers' instantaneous trendline, with its trigger line.
    ///
    /// Returns `(trend, trigger)`, both with the same x values as this series.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// The first three values of both lines are the raw samples. After that:
    ///
    /// ```math
    /// it[i] = (α - α²/4)·y[i] + (α²/2)·y[i-1] - (α - 3α²/4)·y[i-2]
    ///         + 2(1 - α)·it[i-1] - (1 - α)²·it[i-2]
    /// trigger[i] = 2·it[i] - it[i-2]
    /// ```
    ///
    /// The coefficients sum to 1, so a constant or linear input passes through unchanged.
    /// </div>
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `alpha` is not in `(0, 1]`, or the series has fewer
    /// than 3 samples.
    pub fn itrend(&self, alpha: f64) -> Result<(Series, Series)> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::InvalidInput(format!(
                "alpha must be in (0, 1], got {alpha}"
            )));
        }
        if self.len() < 3 {
            return Err(Error::InvalidInput(format!(
                "itrend needs at least 3 samples, got {}",
                self.len()
            )));
        }

        let a2 = alpha * alpha;
        let y = self.y();

        let mut trend = y[..3].to_vec();
        let mut trigger = y[..3].to_vec();
        for i in 3..y.len() {
            let value = (alpha - a2 / 4.0) * y[i] + 0.5 * a2 * y[i - 1]
                - (alpha - 0.75 * a2) * y[i - 2]
                + 2.0 * (1.0 - alpha) * trend[i - 1]
                - (1.0 - alpha).powi(2) * trend[i - 2];
            trend.push(value);
            trigger.push(2.0 * value - trend[i - 2]);
        }

        Ok((
            Series::from_validated(self.x().to_vec(), trend),
            Series::from_validated(self.x().to_vec(), trigger),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_all_close, test::noise::apply_normal_noise};

    fn series(y: &[f64]) -> Series {
        let x = (0..y.len()).map(|i| i as f64).collect();
        Series::from_arrays(x, y.to_vec()).unwrap()
    }

    #[test]
    fn test_trend_changes() {
        let data = series(&[1.0, 2.0, 3.0, 2.0, 1.0, 2.0]);
        let changes = data.trend_changes();
        assert_eq!(changes.x(), &[2.0, 4.0]);
        assert_eq!(changes.y(), &[3.0, 1.0]);
    }

    #[test]
    fn test_trend_changes_ignores_ties() {
        let data = series(&[1.0, 2.0, 2.0, 3.0, 3.0, 1.0]);
        let changes = data.trend_changes();
        assert_eq!(changes.x(), &[4.0]);

        assert!(series(&[1.0, 2.0, 3.0]).trend_changes().is_empty());
        assert!(series(&[2.0, 2.0, 2.0]).trend_changes().is_empty());
        assert!(Series::new().trend_changes().is_empty());
    }

    #[test]
    fn test_recent_trends_limit() {
        let data = series(&[1.0, 2.0, 3.0, 2.0, 1.0, 2.0]);
        let runs = data.recent_trends(2);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].x(), &[4.0, 5.0]);
        assert_eq!(runs[1].x(), &[2.0, 3.0, 4.0]);

        assert!(data.recent_trends(0).is_empty());
        assert_eq!(data.recent_trends(10).len(), 3);
    }

    #[test]
    fn test_recent_trends_monotone() {
        let data = series(&[1.0, 1.0, 2.0, 2.0, 3.0]);
        let runs = data.recent_trends(5);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0], data);

        assert!(Series::new().recent_trends(3).is_empty());
    }

    #[test]
    fn test_smoother() {
        let spike = series(&[0.0, 0.0, 8.0, 0.0, 0.0]);
        assert_eq!(spike.smoother(1).y(), &[0.0, 4.0, 0.0, 4.0, 0.0]);
        assert_eq!(spike.smoother(2).y(), &[0.0, 0.0, 4.0, 0.0, 0.0]);
        assert_eq!(spike.smoother(0), spike);

        // A line is its own neighbour average
        let line = Series::from_fn(0.0..=10.0, 1.0, |x| 3.0 * x - 1.0);
        assert_all_close!(line.smoother(5).y(), line.y());

        let short = series(&[1.0, 9.0]);
        assert_eq!(short.smoother(3), short);
    }

    #[test]
    fn test_smoother_reduces_noise() {
        let clean = Series::from_fn(0.0..=100.0, 1.0, |x| 0.2 * x);
        let noisy = apply_normal_noise(&clean, 2.0, 5);
        let smooth = noisy.smoother(4);

        let before = noisy.standard_error(&clean).unwrap();
        let after = smooth.standard_error(&clean).unwrap();
        assert!(after < before, "{after} >= {before}");
    }

    #[test]
    fn test_quantize() {
        let data = series(&[0.0, 1.0, 4.0, 6.0, 9.0, 12.0]);
        let snapped = data.quantize(4).unwrap();
        assert_all_close!(snapped.y(), [0.0, 0.0, 3.0, 6.0, 9.0, 12.0]);
        assert_eq!(snapped.x(), data.x());

        // Offset range: steps are anchored at the minimum, not at 0
        let data = series(&[10.0, 10.9, 11.2, 12.0]);
        assert_all_close!(data.quantize(2).unwrap().y(), [10.0, 11.0, 11.0, 12.0]);
    }

    #[test]
    fn test_quantize_degenerate() {
        assert!(matches!(
            series(&[1.0, 2.0]).quantize(0),
            Err(Error::InvalidInput(_))
        ));

        let flat = series(&[3.0, 3.0, 3.0]);
        assert_eq!(flat.quantize(4).unwrap(), flat);
        assert!(Series::new().quantize(4).unwrap().is_empty());
    }

    #[test]
    fn test_itrend_validation() {
        let data = series(&[1.0, 2.0, 3.0, 4.0]);
        for alpha in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(data.itrend(alpha), Err(Error::InvalidInput(_))));
        }
        assert!(series(&[1.0, 2.0]).itrend(0.5).is_err());
    }

    #[test]
    fn test_itrend_passes_lines_through() {
        let line = Series::from_fn(0.0..=20.0, 1.0, |x| 2.0 * x + 1.0);
        let (trend, trigger) = line.itrend(0.07).unwrap();

        assert_eq!(trend.x(), line.x());
        assert_all_close!(trend.y(), line.y(), tol = 1e-9);

        // Trigger leads the trend by two steps of slope
        assert_all_close!(&trigger.y()[..3], &line.y()[..3]);
        for i in 3..trigger.len() {
            assert!((trigger.y()[i] - (line.y()[i] + 4.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_itrend_constant() {
        let flat = series(&[7.0; 10]);
        let (trend, trigger) = flat.itrend(0.3).unwrap();
        assert_all_close!(trend.y(), flat.y());
        assert_all_close!(trigger.y(), flat.y());
    }
}
