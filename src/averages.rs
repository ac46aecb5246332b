//! Moving averages over the y column of a [`Series`]
//!
//! Every average here is trailing: the value at a sample is computed from that sample and the
//! `period - 1` samples before it. The first `period - 1` samples have no full window, so the
//! output starts at index `period - 1` and is `period - 1` samples shorter than the input.
//!
//! ```
//! # use seriesfit::Series;
//! let prices = Series::from_arrays(vec![1.0, 2.0, 3.0, 4.0], vec![2.0, 4.0, 6.0, 8.0]).unwrap();
//! let ma = prices.ma(2).unwrap();
//!
//! assert_eq!(ma.x(), &[2.0, 3.0, 4.0]);
//! assert_eq!(ma.y(), &[3.0, 5.0, 7.0]);
//! ```
use crate::{
    error::{Error, Result},
    Series,
};

impl Series {
    fn check_period(&self, period: usize) -> Result<()> {
        if period == 0 || period > self.len() {
            return Err(Error::InvalidInput(format!(
                "period must be in 1..={}, got {period}",
                self.len()
            )));
        }
        Ok(())
    }

    /// Builds the output series from one value per full window.
    fn trailing(&self, period: usize, y: Vec<f64>) -> Series {
        Series::from_validated(self.x()[period - 1..].to_vec(), y)
    }

    /// Simple moving average: the unweighted mean of each trailing window of `period` samples.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `period` is 0 or longer than the series.
    pub fn ma(&self, period: usize) -> Result<Series> {
        self.check_period(period)?;

        let y = self
            .y()
            .windows(period)
            .map(|w| w.iter().sum::<f64>() / period as f64)
            .collect();
        Ok(self.trailing(period, y))
    }

    /// Exponential moving average with multiplier `m = 2 / (period + 1)`.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// The first value is the simple average of the first `period` samples. Each later value is
    ///
    /// ```math
    /// ema[i] = (y[i] - ema[i - 1]) * m + ema[i - 1]
    /// ```
    /// </div>
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `period` is 0 or longer than the series.
    pub fn ema(&self, period: usize) -> Result<Series> {
        self.check_period(period)?;

        let multiplier = 2.0 / (period as f64 + 1.0);
        let seed = self.y()[..period].iter().sum::<f64>() / period as f64;

        let mut y = Vec::with_capacity(self.len() - period + 1);
        y.push(seed);
        let mut ema = seed;
        for &value in &self.y()[period..] {
            ema += (value - ema) * multiplier;
            y.push(ema);
        }

        Ok(self.trailing(period, y))
    }

    /// Linearly weighted moving average.
    ///
    /// Within each window the oldest sample has weight 1 and the newest has weight `period`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `period` is 0 or longer than the series.
    pub fn lwma(&self, period: usize) -> Result<Series> {
        self.check_period(period)?;

        let total_weight = (period * (period + 1) / 2) as f64;
        let y = self
            .y()
            .windows(period)
            .map(|w| {
                w.iter()
                    .enumerate()
                    .map(|(i, v)| v * (i + 1) as f64)
                    .sum::<f64>()
                    / total_weight
            })
            .collect();
        Ok(self.trailing(period, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_all_close, assert_close};

    fn ramp() -> Series {
        Series::from_fn(1.0..=6.0, 1.0, |x| x * 10.0)
    }

    #[test]
    fn test_period_validation() {
        let data = ramp();
        for period in [0, 7] {
            assert!(matches!(data.ma(period), Err(Error::InvalidInput(_))));
            assert!(matches!(data.ema(period), Err(Error::InvalidInput(_))));
            assert!(matches!(data.lwma(period), Err(Error::InvalidInput(_))));
        }
        assert!(Series::new().ma(1).is_err());
    }

    #[test]
    fn test_constant_series() {
        let data = Series::from_fn(0.0..=9.0, 1.0, |_| 5.0);
        for average in [data.ma(3), data.ema(3), data.lwma(3)] {
            let average = average.unwrap();
            assert_eq!(average.len(), 8);
            assert_all_close!(average.y(), [5.0; 8]);
        }
    }

    #[test]
    fn test_ma() {
        let ma = ramp().ma(3).unwrap();
        assert_eq!(ma.x(), &[3.0, 4.0, 5.0, 6.0]);
        assert_all_close!(ma.y(), [20.0, 30.0, 40.0, 50.0]);

        // Period 1 is the identity
        assert_eq!(ramp().ma(1).unwrap(), ramp());
    }

    #[test]
    fn test_ema() {
        // m = 0.5, seeded with (10 + 20 + 30) / 3
        let ema = ramp().ema(3).unwrap();
        assert_eq!(ema.x(), &[3.0, 4.0, 5.0, 6.0]);
        assert_all_close!(ema.y(), [20.0, 30.0, 40.0, 50.0]);

        let data = Series::from_arrays(vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 0.0, 8.0, 0.0]).unwrap();
        let ema = data.ema(1).unwrap();
        // m = 1: tracks the input exactly
        assert_all_close!(ema.y(), data.y());

        let ema = data.ema(2).unwrap();
        // seed 2, then (8 - 2) * 2/3 + 2 = 6, then (0 - 6) * 2/3 + 6 = 2
        assert_all_close!(ema.y(), [2.0, 6.0, 2.0]);
    }

    #[test]
    fn test_lwma() {
        let lwma = ramp().lwma(3).unwrap();
        // (10 + 40 + 90) / 6
        assert_close!(lwma.y()[0], 140.0 / 6.0);
        assert_eq!(lwma.len(), 4);

        // Newest sample weighs the most
        let data = Series::from_arrays(vec![0.0, 1.0], vec![0.0, 3.0]).unwrap();
        assert_close!(data.lwma(2).unwrap().y()[0], 2.0);
    }

    #[test]
    fn test_output_is_independent() {
        let data = ramp();
        let mut ma = data.ma(2).unwrap();
        ma.set(0, -1.0).unwrap();
        assert_eq!(data.y()[1], 20.0);
    }
}
