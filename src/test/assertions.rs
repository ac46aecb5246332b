/// Asserts that two floating-point values are approximately equal.
///
/// This is useful for comparing computed values where exact equality is not expected due to rounding errors.
/// - The default tolerance is relative: `1e-9 * max(1, |a|, |b|)`.
/// - An absolute tolerance can be given with `tol = <value>`.
/// - `assert_eq!` equivalent for floats.
///
/// # Syntax
/// `assert_close!(<a>, <b> [, tol = <tolerance>] [, <msg> [, <args>...]])`
///
/// # Examples
/// ```
/// # use seriesfit::assert_close;
/// assert_close!(0.1 + 0.2, 0.3);
/// assert_close!(1.0, 1.05, tol = 0.1, "loose check");
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr, tol = $tol:expr $(, $($msg:tt)+)?) => { #[allow(clippy::float_cmp)] {
        #[allow(unused_mut, unused_assignments)] let mut msg = "Values not close".to_string();
        $( msg = format!($($msg)+); )?

        let (a, b): (f64, f64) = ($a, $b);
        let tol: f64 = $tol;
        assert!(
            a == b || (a - b).abs() <= tol,
            "{msg}: {a} != {b} (tolerance {tol:e})"
        );
    }};

    ($a:expr, $b:expr $(, $($msg:tt)+)?) => {{
        let (a, b): (f64, f64) = ($a, $b);
        $crate::assert_close!(a, b, tol = 1e-9 * a.abs().max(b.abs()).max(1.0) $(, $($msg)+)?);
    }};
}

/// Asserts that two slices of floating-point values are approximately equal element-wise.
///
/// - Element-wise [`crate::assert_close`], with the same optional `tol = <value>`.
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements is not close.
///
/// # Examples
/// ```
/// # use seriesfit::assert_all_close;
/// let a = [1.0, 2.0, 3.0];
/// let b = [1.0, 2.0 + 1e-12, 3.0];
/// assert_all_close!(a, b);
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr $(, tol = $tol:expr)? $(, $msg:literal)?) => {{
        #[allow(unused_assignments, unused_mut)]
        let mut msg = format!("{} elements", $src.len());
        $( msg = $msg.to_string(); )?

        assert_eq!($src.len(), $dst.len(), "{msg} - length mismatch");

        for (i, (s, d)) in $src.iter().zip($dst.iter()).enumerate() {
            let (s, d): (f64, f64) = (*s, *d);
            #[allow(unused_mut, unused_assignments)]
            let mut tol = 1e-9 * s.abs().max(d.abs()).max(1.0);
            $( tol = $tol; )?
            $crate::assert_close!(s, d, tol = tol, "{msg} - src[{i}]");
        }
    }};
}

/// Asserts that the cached aggregates of a [`crate::Series`] match a full scan of its samples.
///
/// Checks `len`, `max`, `min`, `mean` and `sum`.
///
/// # Examples
/// ```
/// # use seriesfit::{assert_stats_consistent, Series};
/// let mut series = Series::new();
/// series.add(1.0, 4.0).unwrap();
/// series.add(2.0, -1.0).unwrap();
/// assert_stats_consistent!(series);
/// ```
#[macro_export]
macro_rules! assert_stats_consistent {
    ($series:expr) => {{
        let series: &$crate::Series = &$series;
        let y = series.y();

        assert_eq!(series.len(), y.len(), "cached length");
        if y.is_empty() {
            assert_eq!(series.sum(), 0.0, "sum of an empty series");
        } else {
            let max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = y.iter().copied().fold(f64::INFINITY, f64::min);
            let sum: f64 = y.iter().sum();

            $crate::assert_close!(series.max(), max, "cached max");
            $crate::assert_close!(series.min(), min, "cached min");
            $crate::assert_close!(series.sum(), sum, "cached sum");
            $crate::assert_close!(series.mean(), sum / y.len() as f64, "cached mean");
        }
    }};
}

/// Asserts that a fit reproduces every sample of a series when extrapolated at its x values.
///
/// Useful for exact (noise-free) data, where a correct estimator recovers the generating model.
///
/// # Syntax
/// `assert_reproduces!(<FitParameters>, <Series> [, tol = <tolerance>])`
///
/// # Examples
/// ```
/// # use seriesfit::{assert_reproduces, Series};
/// let series = Series::from_fn(0.0..=10.0, 1.0, |x| 3.0 * x - 2.0);
/// let fit = series.fit_linear().unwrap();
/// assert_reproduces!(fit, series, tol = 1e-9);
/// ```
#[macro_export]
macro_rules! assert_reproduces {
    ($fit:expr, $series:expr $(, tol = $tol:expr)?) => {{
        let fit: &$crate::FitParameters = &$fit;
        let series: &$crate::Series = &$series;
        for (x, y) in series.iter() {
            let predicted = fit.extrapolate(x);
            #[allow(unused_mut, unused_assignments)]
            let mut tol = 1e-9 * y.abs().max(predicted.abs()).max(1.0);
            $( tol = $tol; )?
            $crate::assert_close!(predicted, y, tol = tol, "{} fit at x = {x}", fit.kind());
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::Series;

    #[test]
    fn test_assert_close_macro() {
        assert_close!(1.0 + 1e-16, 1.0, "Values should be close");
        assert_close!(1e12 + 1.0, 1e12);
        assert_close!(2.0, 2.5, tol = 0.5);
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_fails() {
        assert_close!(1.0, 1.001);
    }

    #[test]
    fn test_assert_all_close_macro() {
        let a = [1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0 + 1e-15];
        assert_all_close!(a, b);
        assert_all_close!(a, [1.1, 2.1, 3.1], tol = 0.2, "loose");
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_assert_all_close_length() {
        assert_all_close!([1.0, 2.0], [1.0]);
    }

    #[test]
    fn test_assert_stats_consistent_macro() {
        let series = Series::from_fn(0.0..=5.0, 1.0, |x| x * x - 3.0);
        assert_stats_consistent!(series);
        assert_stats_consistent!(Series::new());
    }
}
