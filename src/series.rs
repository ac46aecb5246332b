//! The ordered x/y container and its maintained statistics
//!
//! A [`Series`] owns two parallel columns of samples (`x` and `y`), with `x` non-decreasing,
//! and caches the aggregates of the `y` column: [`Series::max`], [`Series::min`],
//! [`Series::mean`], [`Series::sum`] and [`Series::len`].
//!
//! # Invariants
//! - `x` is non-decreasing. Every mutation path rejects samples that would break this.
//! - The cached aggregates always equal a full scan of the current `y` values.
//!   Mutations update them in O(1) where possible, and fall back to a full rescan
//!   when an extremum is removed or overwritten.
//! - Every derived series ([`Series::slice`], [`Series::last`], [`Series::append`], ...) owns
//!   fresh buffers. Nothing returned by value aliases the storage of its source.
//!   Borrowed views ([`Series::x`], [`Series::y`], [`Series::values`]) are explicit about aliasing.
//!
//! # Capacity
//! A series can be bounded with [`Series::set_capacity`] before any sample is added.
//! Inserting beyond the capacity evicts the oldest samples first.
//!
//! ```rust
//! use seriesfit::Series;
//!
//! let mut series = Series::new();
//! series.set_capacity(3).unwrap();
//! for (x, y) in [(1.0, 5.0), (2.0, 1.0), (3.0, 2.0), (4.0, 3.0)] {
//!     series.add(x, y).unwrap();
//! }
//!
//! assert_eq!(series.len(), 3);
//! assert_eq!(series.x(), &[2.0, 3.0, 4.0]);
//! assert_eq!(series.max(), 3.0);
//! ```
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    value::{CoordExt, SteppedValues},
};

mod column;
mod persist;
mod window;

pub use window::WindowSpec;

/// Result of a binary search over the x column. See [`Series::search_x`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The query is smaller than the first x value.
    BeforeStart,

    /// Index of the first sample with `x >= value`.
    ///
    /// Equal to [`Series::len`] if the query is larger than the last x value.
    Index(usize),
}
impl Position {
    /// Returns the index, or `None` for [`Position::BeforeStart`].
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Self::BeforeStart => None,
            Self::Index(i) => Some(i),
        }
    }
}

/// An ordered sequence of `(x, y)` samples with continuously maintained summary statistics.
///
/// Stored as two parallel columns for locality in numeric loops.
///
/// Serializes as `{ "x": [...], "y": [...] }`. The capacity is not serialized, and the
/// aggregates are recomputed when deserializing. Non-finite values are written as the
/// strings `"NaN"`, `"inf"` and `"-inf"`, so they survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesColumns", into = "SeriesColumns")]
pub struct Series {
    x: Vec<f64>,
    y: Vec<f64>,
    max: f64,
    min: f64,
    mean: f64,
    sum: f64,
    capacity: Option<usize>,
}

#[derive(Serialize, Deserialize)]
struct SeriesColumns {
    #[serde(with = "column")]
    x: Vec<f64>,
    #[serde(with = "column")]
    y: Vec<f64>,
}

impl TryFrom<SeriesColumns> for Series {
    type Error = Error;

    fn try_from(value: SeriesColumns) -> Result<Self> {
        Self::from_arrays(value.x, value.y)
    }
}

impl From<Series> for SeriesColumns {
    fn from(value: Series) -> Self {
        let (x, y) = value.into_arrays();
        Self { x, y }
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that `x` and `y` can form a series.
fn validate_columns(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::InvalidInput(format!(
            "x and y must have the same length ({} != {})",
            x.len(),
            y.len()
        )));
    }

    if let Some(i) = x.iter().position(|x| x.is_nan()) {
        return Err(Error::InvalidInput(format!("x[{i}] is NaN")));
    }

    if let Some(i) = x.windows(2).position(|w| w[1] < w[0]) {
        return Err(Error::InvalidInput(format!(
            "x must be non-decreasing, but x[{}] = {} < x[{i}] = {}",
            i + 1,
            x[i + 1],
            x[i]
        )));
    }

    Ok(())
}

impl Series {
    /// Creates a new, empty series with no capacity bound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            max: 0.0,
            min: 0.0,
            mean: 0.0,
            sum: 0.0,
            capacity: None,
        }
    }

    /// Creates a new, empty series bounded to `capacity` samples.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut series = Self::new();
        series.set_capacity(capacity)?;
        Ok(series)
    }

    /// Creates a series from two equal-length columns.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the lengths differ, or if `x` is not
    /// non-decreasing (or contains NaN).
    ///
    /// # Example
    /// ```
    /// # use seriesfit::Series;
    /// let series = Series::from_arrays(vec![1.0, 2.0, 3.0], vec![3.0, 1.0, 2.0]).unwrap();
    /// assert_eq!(series.mean(), 2.0);
    /// assert!(Series::from_arrays(vec![2.0, 1.0], vec![0.0, 0.0]).is_err());
    /// ```
    pub fn from_arrays(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        validate_columns(&x, &y)?;
        Ok(Self::from_validated(x, y))
    }

    /// Creates a series from paired `(x, y)` rows.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the rows are not ordered by x.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        Self::from_arrays(points.x(), points.y())
    }

    /// Creates a series by sampling `f` over `range`, every `step`.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::Series;
    /// let squares = Series::from_fn(1.0..=9.0, 1.0, |x| x * x);
    /// assert_eq!(squares.len(), 9);
    /// assert_eq!(squares.max(), 81.0);
    /// ```
    pub fn from_fn(range: RangeInclusive<f64>, step: f64, f: impl Fn(f64) -> f64) -> Self {
        let x: Vec<f64> = SteppedValues::new(range, step).collect();
        let y = x.iter().map(|&x| f(x)).collect();
        Self::from_validated(x, y)
    }

    /// Columns already known to be valid
    pub(crate) fn from_validated(x: Vec<f64>, y: Vec<f64>) -> Self {
        let mut series = Self {
            x,
            y,
            ..Self::new()
        };
        series.rescan();
        series
    }

    /// Removes every sample. The capacity bound, if any, is kept.
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.rescan();
    }

    /// Replaces the contents of this series with new columns.
    ///
    /// The capacity bound, if any, is applied to the new contents: only the last
    /// `capacity` samples are kept.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the columns are invalid (see [`Series::from_arrays`]).
    /// The series is left unchanged in that case.
    pub fn use_arrays(&mut self, x: Vec<f64>, y: Vec<f64>) -> Result<()> {
        validate_columns(&x, &y)?;
        self.x = x;
        self.y = y;
        self.rescan();
        self.apply_capacity();
        Ok(())
    }

    /// Recomputes every aggregate from scratch.
    fn rescan(&mut self) {
        if self.y.is_empty() {
            self.max = 0.0;
            self.min = 0.0;
            self.mean = 0.0;
            self.sum = 0.0;
            return;
        }

        self.min = self.y[0];
        self.max = self.y[0];
        self.sum = 0.0;
        for i in 0..self.y.len() {
            let value = self.y[i];
            self.include_extremum(value);
            self.sum += value;
        }
        self.update_mean();
    }

    fn update_mean(&mut self) {
        self.mean = if self.y.is_empty() {
            0.0
        } else {
            self.sum / self.y.len() as f64
        };
    }

    fn include_extremum(&mut self, value: f64) {
        if self.min > value {
            self.min = value;
        }
        if self.max < value {
            self.max = value;
        }
    }

    /// Appends one sample to the end of the series.
    ///
    /// Aggregates are updated in O(1). If the series has a capacity and is full,
    /// the oldest sample is evicted.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `x` is NaN or smaller than the last x value.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::Series;
    /// let mut series = Series::new();
    /// series.add(1.0, 10.0).unwrap();
    /// series.add(2.0, 20.0).unwrap();
    /// assert_eq!(series.mean(), 15.0);
    /// assert!(series.add(1.5, 0.0).is_err());
    /// ```
    pub fn add(&mut self, x: f64, y: f64) -> Result<()> {
        if x.is_nan() {
            return Err(Error::invalid_input("x is NaN"));
        }
        if let Some(&last) = self.x.last() {
            if x < last {
                return Err(Error::InvalidInput(format!(
                    "x = {x} is less than the last x value {last}"
                )));
            }
        }

        self.x.push(x);
        self.y.push(y);
        self.sum += y;
        if self.y.len() == 1 {
            self.min = y;
            self.max = y;
        } else {
            self.include_extremum(y);
        }
        self.update_mean();
        self.apply_capacity();
        Ok(())
    }

    /// Overwrites the y value at `index`.
    ///
    /// If the old value was the cached maximum or minimum, the series is rescanned,
    /// since the old extremum may no longer exist. Otherwise the update is O(1).
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `index` is out of range.
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.len();
        let slot = self
            .y
            .get_mut(index)
            .ok_or_else(|| Error::InvalidInput(format!("index {index} out of range (len {len})")))?;

        let old = std::mem::replace(slot, value);
        if old == self.max || old == self.min {
            self.rescan();
        } else {
            self.sum += value - old;
            self.include_extremum(value);
            self.update_mean();
        }
        Ok(())
    }

    /// Bounds the series to at most `capacity` samples, evicting the oldest first.
    ///
    /// # Errors
    /// - [`Error::InvalidState`] if the series is not empty; eviction order is only
    ///   meaningful if the bound applied from the first insertion.
    /// - [`Error::InvalidInput`] if `capacity` is 0.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::InvalidState(format!(
                "capacity cannot be set on a series holding {} samples",
                self.len()
            )));
        }
        if capacity == 0 {
            return Err(Error::invalid_input("capacity must be at least 1"));
        }

        self.capacity = Some(capacity);
        self.x = Vec::with_capacity(capacity);
        self.y = Vec::with_capacity(capacity);
        Ok(())
    }

    /// Returns the capacity bound, if one was set.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Evicts samples beyond the capacity, oldest first.
    fn apply_capacity(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        if self.len() <= capacity {
            return;
        }

        let overflow = self.len() - capacity;
        let mut evicted = 0.0;
        let mut extremum_evicted = false;
        for &value in &self.y[..overflow] {
            evicted += value;
            if value == self.max || value == self.min {
                extremum_evicted = true;
            }
        }

        self.x.drain(..overflow);
        self.y.drain(..overflow);

        if extremum_evicted {
            log::debug!("evicted an extremum; rescanning {} samples", self.len());
            self.rescan();
        } else {
            self.sum -= evicted;
            self.update_mean();
        }
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the series holds no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Largest y value, or 0 if empty
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Smallest y value, or 0 if empty
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Arithmetic mean of the y values, or 0 if empty
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Running sum of the y values
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the sample at `index`.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        Some((*self.x.get(index)?, *self.y.get(index)?))
    }

    /// Borrowed view of the x column.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Borrowed view of the y column.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Iterates over the samples as `(x, y)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Returns owned copies of both columns.
    #[must_use]
    pub fn to_arrays(&self) -> (Vec<f64>, Vec<f64>) {
        (self.x.clone(), self.y.clone())
    }

    /// Consumes the series, returning its columns.
    #[must_use]
    pub fn into_arrays(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }

    /// Borrowed view of `length` samples, ending `offset` samples before the end.
    ///
    /// The returned slices alias this series' storage.
    /// Returns `None` if the requested range does not fit.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::Series;
    /// let series = Series::from_fn(1.0..=5.0, 1.0, |x| x * 10.0);
    /// let (x, y) = series.values(2, 1).unwrap();
    /// assert_eq!(x, &[3.0, 4.0]);
    /// assert_eq!(y, &[30.0, 40.0]);
    /// ```
    #[must_use]
    pub fn values(&self, length: usize, offset: usize) -> Option<(&[f64], &[f64])> {
        let end = self.len().checked_sub(offset)?;
        let start = end.checked_sub(length)?;
        Some((&self.x[start..end], &self.y[start..end]))
    }

    /// Creates a new series from the samples in `start..end`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the range is reversed or out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(Error::InvalidInput(format!(
                "slice {start}..{end} out of range (len {})",
                self.len()
            )));
        }
        Ok(Self::from_validated(
            self.x[start..end].to_vec(),
            self.y[start..end].to_vec(),
        ))
    }

    /// Creates a new series containing the last `n` samples (or all of them, if there are fewer).
    #[must_use]
    pub fn last(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        Self::from_validated(self.x[start..].to_vec(), self.y[start..].to_vec())
    }

    /// Creates a new series starting from the earliest sample with an x value of at least `x`.
    ///
    /// A value before the first sample yields a copy of the whole series;
    /// a value after the last sample yields an empty series.
    #[must_use]
    pub fn since(&self, x: f64) -> Self {
        let start = self.search_x(x).index().unwrap_or(0);
        Self::from_validated(self.x[start..].to_vec(), self.y[start..].to_vec())
    }

    /// Creates a new series with the samples of `other` appended after those of `self`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if `other` starts before the end of `self`.
    pub fn append(&self, other: &Series) -> Result<Self> {
        if let (Some(&last), Some(&first)) = (self.x.last(), other.x.first()) {
            if first < last {
                return Err(Error::InvalidInput(format!(
                    "appended series starts at x = {first}, before the last x value {last}"
                )));
            }
        }

        let mut x = Vec::with_capacity(self.len() + other.len());
        let mut y = Vec::with_capacity(self.len() + other.len());
        x.extend_from_slice(&self.x);
        x.extend_from_slice(&other.x);
        y.extend_from_slice(&self.y);
        y.extend_from_slice(&other.y);
        Ok(Self::from_validated(x, y))
    }

    /// Creates a new series shifted by `dx` on the x axis and `dy` on the y axis.
    #[must_use]
    pub fn apply_offset(&self, dx: f64, dy: f64) -> Self {
        let x = self.x.iter().map(|x| x + dx).collect();
        let y = self.y.iter().map(|y| y + dy).collect();
        Self::from_validated(x, y)
    }

    /// Binary search for the earliest sample whose x value is at least `value`.
    ///
    /// - Returns [`Position::BeforeStart`] if `value` is less than the first x value.
    /// - Returns [`Position::Index`]`(len)` if `value` is greater than the last x value,
    ///   or if the series is empty.
    /// - Among equal x values, the leftmost index is returned.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::{Series, Position};
    /// let series = Series::from_arrays(vec![1.0, 2.0, 2.0, 4.0], vec![0.0; 4]).unwrap();
    /// assert_eq!(series.search_x(2.0), Position::Index(1));
    /// assert_eq!(series.search_x(3.0), Position::Index(3));
    /// assert_eq!(series.search_x(0.0), Position::BeforeStart);
    /// assert_eq!(series.search_x(9.0), Position::Index(4));
    /// ```
    #[must_use]
    pub fn search_x(&self, value: f64) -> Position {
        let (Some(&first), Some(&last)) = (self.x.first(), self.x.last()) else {
            return Position::Index(0);
        };

        if first > value {
            return Position::BeforeStart;
        }
        if last < value {
            return Position::Index(self.len());
        }

        Position::Index(self.x.partition_point(|&x| x < value))
    }
}
