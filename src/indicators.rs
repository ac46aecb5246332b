//! Financial indicators composed from the series primitives
use crate::{
    error::{Error, Result},
    Series, WindowSpec,
};

/// Scale factor of the channel index, chosen so that most values fall within ±100.
pub const CHANNEL_INDEX_SCALE: f64 = 0.015;

impl Series {
    /// Commodity channel index over time windows.
    ///
    /// Each window of `window` is summarized as its typical price, keyed by the x of its last
    /// sample. The index compares each typical price to its trailing [`Series::ma`] of
    /// `average_period` windows, in units of the mean deviation of all typical prices.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// tp = (Max + Min + y_last) / 3
    /// CCI = (tp - MA(tp)) / (0.015 · MeanDev(tp))
    /// ```
    ///
    /// Like the moving average, the result starts at the `average_period`-th window.
    /// </div>
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::InvalidInput`] if fewer than `average_period` windows hold data, or
    ///   `average_period` is 0.
    /// - [`Error::Domain`] if every typical price is the same (zero mean deviation).
    ///
    /// # Example
    /// ```
    /// # use seriesfit::{Series, WindowSpec};
    /// let prices = Series::from_fn(0.0..=59.0, 1.0, |x| 100.0 + (x / 5.0).sin() * 10.0);
    /// let cci = prices.channel_index(WindowSpec::new(3.0, 15).unwrap(), 4).unwrap();
    ///
    /// assert_eq!(cci.len(), 12);
    /// ```
    pub fn channel_index(&self, window: WindowSpec, average_period: usize) -> Result<Series> {
        self.map_reduce(
            |w| {
                let last = w.len() - 1;
                let typical = (w.max() + w.min() + w.y()[last]) / 3.0;
                (w.x()[last], typical)
            },
            |x, y| {
                let typical = Series::from_arrays(x, y)?;
                let average = typical.ma(average_period)?;

                let deviation = typical.mean_dev();
                if !(deviation > 0.0) {
                    return Err(Error::Domain(format!(
                        "typical prices have a mean deviation of {deviation}"
                    )));
                }

                let offset = average_period - 1;
                let index = typical.y()[offset..]
                    .iter()
                    .zip(average.y())
                    .map(|(tp, ma)| (tp - ma) / (CHANNEL_INDEX_SCALE * deviation))
                    .collect();
                Ok(Series::from_validated(average.x().to_vec(), index))
            },
            window,
        )
    }
}
