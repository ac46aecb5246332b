//! Iteration utilities for x/y sample data.
//!
//! # Iterators
//!
//! - [`SteppedValues`]: A floating-point range iterator with a specified step,
//!   useful for generating evaluation points for fits and synthetic series.
//!
//! # Traits
//!
//! - [`CoordExt`]: Column access over paired `(x, y)` rows.
//!
//! # Example
//!
//! ```rust
//! use seriesfit::value::SteppedValues;
//!
//! // Create a range of f64 values from 0.0 to 1.0 in steps of 0.25
//! let xs: Vec<f64> = SteppedValues::new(0.0..=1.0, 0.25).collect();
//! assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
//! ```
use std::ops::{Range, RangeInclusive};

/// Iterator over a range of floating-point values with a specified step.
///
/// This iterator yields values starting from `start` up to and including `end`,
/// incrementing by `step` on each iteration.
///
/// Each value is computed as `start + index * step` rather than by repeated
/// addition, so long ranges do not accumulate drift.
#[derive(Debug, Clone)]
pub struct SteppedValues {
    range: RangeInclusive<f64>,
    step: f64,
    index: f64,
}
impl SteppedValues {
    /// Creates a new iterator over stepped values in a range
    ///
    /// Will yield values starting from `range.start` up to and including `range.end`.
    /// A non-positive or non-finite `step`, or a non-finite bound, yields nothing.
    #[must_use]
    pub fn new(range: RangeInclusive<f64>, step: f64) -> Self {
        Self {
            range,
            step,
            index: 0.0,
        }
    }
}
impl Iterator for SteppedValues {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        let bounded = self.range.start().is_finite() && self.range.end().is_finite();
        if !(bounded && self.step > 0.0 && self.step.is_finite()) {
            return None;
        }

        let value = *self.range.start() + self.index * self.step;
        if value <= *self.range.end() {
            self.index += 1.0;
            Some(value)
        } else {
            None
        }
    }
}

/// Extension trait for accessing the `x` and `y` columns of paired rows.
///
/// # Examples
///
/// ```
/// # use seriesfit::value::CoordExt;
/// let data = vec![(1.5, -2.0), (2.0, 3.0), (3.0, 1.0)];
/// assert_eq!(data.y(), vec![-2.0, 3.0, 1.0]);
/// assert_eq!(data.x_range(), Some(1.5..3.0));
/// ```
pub trait CoordExt {
    /// Returns an iterator over the x-coordinates.
    fn x_iter(&self) -> impl Iterator<Item = f64>;

    /// Returns an iterator over the y-coordinates.
    fn y_iter(&self) -> impl Iterator<Item = f64>;

    /// Returns the x-coordinates.
    fn x(&self) -> Vec<f64> {
        self.x_iter().collect()
    }

    /// Returns the y-coordinates.
    fn y(&self) -> Vec<f64> {
        self.y_iter().collect()
    }

    /// Returns the range of x-coordinates, or `None` if there are none.
    fn x_range(&self) -> Option<Range<f64>> {
        self.x_iter()
            .fold(None, |acc: Option<(f64, f64)>, x| {
                Some(match acc {
                    Some((min, max)) => (min.min(x), max.max(x)),
                    None => (x, x),
                })
            })
            .map(|(start, end)| start..end)
    }
}

impl CoordExt for [(f64, f64)] {
    fn x_iter(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|&(x, _)| x)
    }

    fn y_iter(&self) -> impl Iterator<Item = f64> {
        self.iter().map(|&(_, y)| y)
    }
}

impl CoordExt for Vec<(f64, f64)> {
    fn x_iter(&self) -> impl Iterator<Item = f64> {
        self.as_slice().x_iter()
    }

    fn y_iter(&self) -> impl Iterator<Item = f64> {
        self.as_slice().y_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_values_inclusive() {
        let values: Vec<_> = SteppedValues::new(1.0..=3.0, 0.5).collect();
        assert_eq!(values, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_stepped_values_unbounded() {
        assert_eq!(SteppedValues::new(f64::NEG_INFINITY..=2.0, 1.0).count(), 0);
        assert_eq!(SteppedValues::new(0.0..=f64::INFINITY, 1.0).count(), 0);
        assert_eq!(SteppedValues::new(f64::NAN..=2.0, 1.0).count(), 0);
        assert!(crate::Series::from_fn(f64::NEG_INFINITY..=0.0, 1.0, |x| x).is_empty());
    }

    #[test]
    fn test_stepped_values_bad_step() {
        assert_eq!(SteppedValues::new(0.0..=2.0, 0.0).count(), 0);
        assert_eq!(SteppedValues::new(0.0..=2.0, -1.0).count(), 0);
        assert_eq!(SteppedValues::new(0.0..=2.0, f64::NAN).count(), 0);
    }

    #[test]
    fn test_coord_ext() {
        let data = vec![(1.0, 4.0), (2.0, 5.0), (0.5, 6.0)];
        assert_eq!(data.x(), vec![1.0, 2.0, 0.5]);
        assert_eq!(data.y(), vec![4.0, 5.0, 6.0]);
        assert_eq!(data.x_range(), Some(0.5..2.0));

        let empty: Vec<(f64, f64)> = Vec::new();
        assert_eq!(empty.x_range(), None);
    }
}
