//! Assertions for validating series invariants and fit quality in tests.
//!
//! # Features
//!
//! ## Numeric comparison
//!
//! ### [`crate::assert_close`]
//! Asserts that two floating-point values are approximately equal.
//! - Relative tolerance by default, or an absolute one with `tol = <value>`.
//! - `assert_eq!` equivalent for floats.
//!
//! ### [`crate::assert_all_close`]
//! Element-wise [`crate::assert_close`] over two slices of the same length.
//!
//! ## Series invariants
//!
//! ### [`crate::assert_stats_consistent`]
//! Asserts that the cached `max`, `min`, `mean`, `sum` and `len` of a [`crate::Series`]
//! equal a fresh scan of its samples. Run it after every mutation in a test to catch
//! incremental-update bugs at the step that introduced them.
//!
//! ## Fit quality
//!
//! ### [`crate::assert_reproduces`]
//! Asserts that a [`crate::FitParameters`] reproduces every sample of a series at its x values.
//! Intended for exact, noise-free data generated from the fitted model.
//! ```rust
//! # use seriesfit::{assert_reproduces, Series};
//! let data = Series::from_fn(1.0..=9.0, 1.0, |x| x * x);
//! let fit = data.fit_polynomial(2).unwrap();
//! assert_reproduces!(fit, data, tol = 1e-6);
//! ```
mod assertions;

/// Seeded Gaussian noise for synthetic test data.
#[cfg(test)]
pub(crate) mod noise {
    use rand::{rngs::StdRng, SeedableRng};
    use rand_distr::{Distribution, Normal};

    use crate::Series;

    /// Returns a copy of `series` with normally distributed noise of standard deviation `sigma` added to y.
    ///
    /// The same `seed` always produces the same noise.
    pub fn apply_normal_noise(series: &Series, sigma: f64, seed: u64) -> Series {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, sigma).expect("valid standard deviation");

        let (x, mut y) = series.to_arrays();
        for y in &mut y {
            *y += normal.sample(&mut rng);
        }
        Series::from_arrays(x, y).expect("x is unchanged")
    }
}
