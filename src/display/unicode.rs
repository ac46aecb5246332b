//! Unicode formatting utilities
use std::ops::Range;

/// Format a floating point number as a string
///
/// # Parameters
/// - `n`: The number to format
/// - `fixed_range`: An optional range of magnitudes that will not be formatted in scientific notation
/// - `precision`: The number of decimal places to include
///
/// Non-finite values are written as `NaN`, `inf` or `-inf`.
#[must_use]
pub fn float(n: f64, fixed_range: Option<Range<f64>>, precision: usize) -> String {
    match fixed_range {
        _ if !n.is_finite() => format!("{n}"),
        Some(range) if range.contains(&n.abs()) => format!("{n:.precision$}"),
        _ => format!("{n:.precision$e}"),
    }
}

/// Superscript forms of `0` to `9`
const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Writes an integer exponent in superscript, e.g. `-12` as `⁻¹²`.
#[must_use]
pub fn superscript(exp: i32) -> String {
    let digits = exp.unsigned_abs().to_string();
    let sign = (exp < 0).then_some('⁻');
    sign.into_iter()
        .chain(
            digits
                .bytes()
                .map(|digit| SUPERSCRIPT_DIGITS[usize::from(digit - b'0')]),
        )
        .collect()
}
