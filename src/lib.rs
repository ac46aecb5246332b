//! # Seriesfit
//! ## Time series in, equations out
//!
//! Ordered `(x, y)` data with its summary statistics always on hand, plus the numeric tools
//! people usually end up writing around such data: moving averages, trend detection,
//! windowed summaries, closed-form curve fits and a LOESS smoother.
//!
//! The simplest use-case is to find a mathematical function that approximates a set of data:
//! ```rust
//! use seriesfit::{Series, FitKind};
//!
//! let data = Series::from_fn(1.0..=20.0, 1.0, |x| 2.0 * x * x + 3.0 * x - 5.0);
//! let fit = data.fit(FitKind::Polynomial, 2).unwrap();
//!
//! assert!(fit.r_squared(&data).unwrap() > 0.999);
//! println!("{fit}");
//! ```
//!
//! # Core Concepts
//! - A [`Series`] is an ordered sequence of samples, with x non-decreasing.
//!     - `max`, `min`, `mean`, `sum` and `len` are cached and kept up to date by every mutation.
//!     - It can be bounded with [`Series::set_capacity`], evicting the oldest samples first.
//!     - Every operation that derives a new series returns fresh, independently owned storage.
//! - [`Series::map_reduce`] walks the series in fixed-length time windows (see [`WindowSpec`]),
//!   located by binary search over x ([`Series::search_x`]).
//! - [`FitParameters`] is the result of a regression: the [`Model`] and the calibration offsets
//!   used to fit it. Evaluate it with [`FitParameters::extrapolate`].
//!     - Fits are available for every [`FitKind`]: linear, logarithmic, power, exponential,
//!       polynomial, Gaussian and parabolic.
//! - [`Series::loess`] smooths a series with locally weighted linear regression.
//!
//! # Statistics and indicators
//! - [`statistics`]: standard deviation, mean deviation, R² and standard error.
//! - Moving averages: [`Series::ma`], [`Series::ema`] and [`Series::lwma`].
//! - Trends: [`Series::trend_changes`], [`Series::recent_trends`], [`Series::smoother`],
//!   [`Series::quantize`] and [`Series::itrend`].
//! - [`Series::channel_index`], the commodity channel index over time windows.
//!
//! # Implementation Details
//!
//! The polynomial normal equations are stored as `nalgebra` matrices and solved by Gaussian
//! elimination with partial pivoting ([`solver`]). Everything runs synchronously on the
//! caller's thread. Diagnostics go through the `log` facade; install any logger to see them.
//!
//! # Testing utilities
//!
//! This crate includes a set of assertion macros for series invariants and fit quality. See [`test`].
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // Sample counts never get near 2^52
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar

pub mod test;

pub mod display;
pub mod error;
pub mod loess;
pub mod solver;
pub mod statistics;
pub mod value;

mod averages;
mod fit;
mod indicators;
mod series;
mod trend;

pub use fit::*;
pub use indicators::CHANNEL_INDEX_SCALE;
pub use series::{Position, Series, WindowSpec};

pub use nalgebra;
