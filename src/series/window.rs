//! Map/reduce over fixed-length time windows
use serde::{Deserialize, Serialize};

use super::{Position, Series};
use crate::error::{Error, Result};

/// Shape of a windowed map/reduce walk: `count` windows of `period` x-units each.
///
/// Window boundaries are located by value (binary search over x), not by stride,
/// so irregularly sampled series are partitioned correctly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    period: f64,
    count: usize,
}
impl WindowSpec {
    /// Creates a new window specification.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `period` is not a positive finite number, or `count` is 0.
    pub fn new(period: f64, count: usize) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(Error::InvalidInput(format!(
                "window period must be positive and finite, got {period}"
            )));
        }
        if count == 0 {
            return Err(Error::invalid_input("window count must be at least 1"));
        }
        Ok(Self { period, count })
    }

    /// Length of each window, in x units
    #[must_use]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Maximum number of windows produced
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Series {
    /// Partitions the series into time windows, summarizes each, and folds the summaries into a new series.
    ///
    /// Windows are aligned backwards from the last sample: the first window starts at
    /// `last_x - period * count`, and each window covers `[start, start + period)`.
    /// The walk continues up to (and including) the window that starts at `last_x`,
    /// so the most recent samples are always covered.
    ///
    /// - `map` receives each non-empty window as a fresh [`Series`] and returns one `(x, y)` summary.
    /// - Windows that are empty, or that start before the first sample, are skipped without consuming a slot.
    /// - At most `window.count()` summaries are produced. They are passed to `reduce`, oldest first.
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - Any error returned by `reduce`.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::{Series, WindowSpec};
    /// let series = Series::from_fn(0.0..=9.0, 1.0, |x| x);
    /// let window = WindowSpec::new(3.0, 3).unwrap();
    ///
    /// // Mean of each window, keyed by its last x value
    /// let means = series
    ///     .map_reduce(
    ///         |w| (w.x()[w.len() - 1], w.mean()),
    ///         |x, y| Series::from_arrays(x, y),
    ///         window,
    ///     )
    ///     .unwrap();
    ///
    /// assert_eq!(means.x(), &[2.0, 5.0, 8.0]);
    /// assert_eq!(means.y(), &[1.0, 4.0, 7.0]);
    /// ```
    pub fn map_reduce<M, R>(&self, mut map: M, reduce: R, window: WindowSpec) -> Result<Series>
    where
        M: FnMut(&Series) -> (f64, f64),
        R: FnOnce(Vec<f64>, Vec<f64>) -> Result<Series>,
    {
        let Some(&last_x) = self.x.last() else {
            return Err(Error::NoData);
        };

        let WindowSpec { period, count } = window;
        let origin = last_x - period * count as f64;

        let mut mapped_x = Vec::with_capacity(count);
        let mut mapped_y = Vec::with_capacity(count);
        for step in 0..=count {
            if mapped_x.len() == count {
                break;
            }

            // Boundaries are computed from the origin rather than accumulated, to avoid drift
            let start = origin + period * step as f64;
            if start > last_x {
                break;
            }

            let Position::Index(first) = self.search_x(start) else {
                log::debug!("window at x = {start} starts before the data; skipped");
                continue;
            };
            let end = self.search_x(start + period).index().unwrap_or(0);
            if end <= first {
                continue;
            }

            let slice = self.slice(first, end)?;
            let (x, y) = map(&slice);
            mapped_x.push(x);
            mapped_y.push(y);
        }

        reduce(mapped_x, mapped_y)
    }
}
