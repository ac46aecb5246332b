//! Utilities for displaying and formatting fitted equations
//!
//! This module converts fitted models into human-readable strings, handles
//! coefficient formatting, and adds superscript exponents.
//!
//! # Key Concepts
//! - **[`EquationDisplay`]**: Trait to define how a model renders its terms.
//! - **[`Term`]**: Represents a single term with a sign and body.
//! - **[`Sign`]**: Tracks whether a term is positive or negative.
//!
//! # Using Display
//! 1. Implement [`EquationDisplay`] for your model to control term formatting.
//! 2. Use [`EquationDisplay::format_equation`] to render the full equation as `"y(x) = ..."`.
//!
//! # Helpers
//! - [`format_coefficient`]: Formats a numeric coefficient, skipping zeros.
//! - [`format_variable`]: Adds a Unicode superscript exponent to a variable.
//! - [`polynomial_terms`]: Renders a coefficient vector as polynomial terms, highest degree first.
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

pub mod unicode;

/// Default precision for formatting used by the provided implementations of [`EquationDisplay`]
pub const DEFAULT_PRECISION: usize = 2;

/// Range in which scientific notation is not used
pub const FIXED_RANGE: std::ops::Range<f64> = 1e-3..1e3;

/// Name of the shifted x variable in rendered equations
pub const SHIFTED_X: &str = "xₛ";

/// Trait for formatting and displaying fitted equations.
///
/// Implementors produce the terms of the model. A default implementation
/// assembles them into a full equation.
///
/// # Provided behavior
/// - [`EquationDisplay::terms`] is required: the terms of the equation, in display order.
/// - [`EquationDisplay::format_equation`] is provided: writes `"y(x) = ..."` into any
///   [`std::fmt::Write`] buffer.
pub trait EquationDisplay {
    /// Returns the terms of the equation, in display order.
    ///
    /// Zero terms should be left out (see [`format_coefficient`]).
    fn terms(&self) -> Vec<Term>;

    /// Formats the variable substitution used by the equation, if any.
    ///
    /// Written before the equation itself, e.g. `"xₛ = x - 4.00"`.
    fn format_scaling_formula(&self) -> Option<String> {
        None
    }

    /// Writes the full expression into the provided buffer, as `"y(x) = ..."`.
    ///
    /// Terms are joined by [`write_terms`], preceded by the scaling formula if there is one.
    ///
    /// # Errors
    /// Returns an error if writing to `buffer` fails.
    fn format_equation<B: std::fmt::Write>(&self, buffer: &mut B) -> std::fmt::Result {
        // Scaling first
        if let Some(scaling) = self.format_scaling_formula() {
            write!(buffer, "{scaling}, ")?;
        }

        write!(buffer, "y(x) = ")?;
        write_terms(buffer, self.terms())
    }
}

/// Writes a sequence of terms joined by their signs.
///
/// # Behavior
/// - The first term is written without a leading `+`.
/// - Subsequent terms are prepended with `+` or `-` depending on the sign.
/// - No terms are written as `0`.
///
/// # Errors
/// Returns an error if writing to `buffer` fails.
pub fn write_terms<B: std::fmt::Write>(
    buffer: &mut B,
    terms: impl IntoIterator<Item = Term>,
) -> std::fmt::Result {
    let mut terms = terms.into_iter();
    let Some(first) = terms.next() else {
        return write!(buffer, "0");
    };

    // Avoid a leading '+'
    if first.sign == Sign::Negative {
        write!(buffer, "{}", first.sign.char())?;
    }
    write!(buffer, "{}", first.body)?;

    for term in terms {
        let sign = term.sign.char();
        let body = term.body;
        write!(buffer, " {sign} {body}")?;
    }

    Ok(())
}

/// Represents the sign of a term.
///
/// Used when formatting expressions to determine how a term
/// should be connected to the rest of the equation (e.g., with `+` or `-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}

impl Sign {
    /// Determines the sign from a numeric coefficient.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::display::Sign;
    /// assert_eq!(Sign::from_coef(3.0), Sign::Positive);
    /// assert_eq!(Sign::from_coef(-2.0), Sign::Negative);
    /// ```
    #[must_use]
    pub fn from_coef(coef: f64) -> Self {
        if coef.is_sign_negative() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// Returns the character representation of the sign.
    #[must_use]
    pub fn char(&self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// Represents a single term of an equation for display purposes.
///
/// A `Term` combines the **sign** and the **formatted body** of a component
/// (e.g., `"2.00xₛ²"`, `"3.14"`, `"2.00e^(0.50xₛ)"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The sign of the term (positive or negative).
    pub sign: Sign,

    /// The body of the term, without its sign.
    pub body: String,
}

impl Term {
    /// Creates a new term with the given sign and body.
    #[must_use]
    pub fn new(sign: Sign, body: String) -> Self {
        Self { sign, body }
    }

    /// Creates a term for `coef` multiplied by `base`, or `None` if `coef` is zero.
    ///
    /// A unit coefficient is omitted unless `base` is empty.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::display::{Term, Sign};
    /// let term = Term::scaled(-1.0, "ln(xₛ)").unwrap();
    /// assert_eq!(term.sign, Sign::Negative);
    /// assert_eq!(term.body, "ln(xₛ)");
    /// ```
    #[must_use]
    pub fn scaled(coef: f64, base: &str) -> Option<Self> {
        let degree = i32::from(!base.is_empty());
        let coef_str = format_coefficient(coef, degree, DEFAULT_PRECISION)?;
        Some(Self::new(Sign::from_coef(coef), format!("{coef_str}{base}")))
    }
}

/// Formats a numeric coefficient for display in a term.
///
/// - Returns `None` if the coefficient is zero or effectively zero (≤ epsilon).
/// - Returns an empty string for a unit coefficient of a non-constant term (`degree != 0`).
/// - Formats as a decimal if the absolute value is in [`FIXED_RANGE`].
/// - Formats in scientific notation otherwise.
/// - The sign is not included; see [`Sign::from_coef`].
///
/// Non-finite coefficients are written as-is (`NaN`, `inf`).
///
/// # Example
/// ```
/// # use seriesfit::display::format_coefficient;
/// assert_eq!(format_coefficient(0.0, 1, 2), None);
/// assert_eq!(format_coefficient(2.5, 1, 2), Some("2.50".to_string()));
/// assert_eq!(format_coefficient(1e5, 1, 2), Some("1.00e5".to_string()));
/// ```
#[must_use]
pub fn format_coefficient(coef: f64, degree: i32, precision: usize) -> Option<String> {
    let abs = coef.abs();

    if coef == 0.0 || abs <= f64::EPSILON {
        return None;
    }

    if (abs - 1.0).abs() <= f64::EPSILON && degree != 0 {
        return Some(String::new());
    }

    Some(unicode::float(abs, Some(FIXED_RANGE), precision))
}

/// Formats the variable part of a term for display purposes.
///
/// # Behavior
/// - If `exp == 0`, returns an empty string (`""`).
/// - If `exp == 1`, returns the base string unchanged.
/// - Otherwise, appends the Unicode superscript version of `exp` to `base`.
///
/// # Examples
/// ```
/// # use seriesfit::display::format_variable;
/// assert_eq!(format_variable("x", 0), "");
/// assert_eq!(format_variable("x", 1), "x");
/// assert_eq!(format_variable("xₛ", 2), "xₛ²");
/// ```
#[must_use]
pub fn format_variable(base: &str, exp: i32) -> String {
    match exp {
        0 => String::new(),
        1 => base.to_string(),
        _ => format!("{base}{}", unicode::superscript(exp)),
    }
}

/// Renders polynomial coefficients as terms in `variable`, highest degree first.
///
/// `coefficients[i]` is the coefficient of `variable^i`. Zero coefficients are skipped.
#[must_use]
pub fn polynomial_terms(coefficients: &[f64], variable: &str) -> Vec<Term> {
    coefficients
        .iter()
        .enumerate()
        .rev()
        .filter_map(|(degree, &coef)| Term::scaled(coef, &format_variable(variable, degree as i32)))
        .collect()
}

/// Renders the `xₛ = x - offset` substitution, or `None` for a zero offset.
#[must_use]
pub fn format_shift(offset: f64) -> Option<String> {
    let sign = Sign::from_coef(-offset).char();
    let value = format_coefficient(offset, 0, DEFAULT_PRECISION)?;
    Some(format!("{SHIFTED_X} = x {sign} {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DummyModel(Vec<f64>);

    impl EquationDisplay for DummyModel {
        fn terms(&self) -> Vec<Term> {
            polynomial_terms(&self.0, "x")
        }
    }

    fn render(model: &impl EquationDisplay) -> String {
        let mut buf = String::new();
        model.format_equation(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_sign_from_coef() {
        assert_eq!(Sign::from_coef(1.0), Sign::Positive);
        assert_eq!(Sign::from_coef(-1.0), Sign::Negative);
        assert_eq!(Sign::from_coef(0.0), Sign::Positive);
        assert_eq!(Sign::Negative.char(), '-');
    }

    #[test]
    fn test_format_coefficient() {
        assert_eq!(format_coefficient(2.5, 1, 2), Some("2.50".to_string()));
        assert_eq!(format_coefficient(-2.5, 1, 2), Some("2.50".to_string()));
        assert_eq!(format_coefficient(0.0, 1, 2), None);
        assert_eq!(format_coefficient(1e-20, 1, 2), None);
        assert_eq!(format_coefficient(1e-5, 2, 2), Some("1.00e-5".to_string()));
        assert_eq!(format_coefficient(1.0, 1, 2), Some(String::new()));
        assert_eq!(format_coefficient(1.0, 0, 2), Some("1.00".to_string()));
    }

    #[test]
    fn test_format_variable() {
        assert_eq!(format_variable("x", 0), "");
        assert_eq!(format_variable("x", 1), "x");
        assert_eq!(format_variable("xₛ", 3), "xₛ³");
        assert_eq!(format_variable("x", -2), "x⁻²");
    }

    #[test]
    fn test_format_polynomial() {
        assert_eq!(
            render(&DummyModel(vec![2.0, -3.0, 0.0, 4.0])),
            "y(x) = 4.00x³ - 3.00x + 2.00"
        );
        assert_eq!(render(&DummyModel(vec![-1.0, 2.0])), "y(x) = 2.00x - 1.00");
        assert_eq!(render(&DummyModel(vec![0.0, 0.0, 1.0])), "y(x) = x²");
        assert_eq!(render(&DummyModel(vec![0.0, 0.0])), "y(x) = 0");
    }

    #[test]
    fn test_leading_negative() {
        assert_eq!(render(&DummyModel(vec![1.0, -2.0])), "y(x) = -2.00x + 1.00");
    }

    #[test]
    fn test_format_shift() {
        assert_eq!(format_shift(4.0), Some("xₛ = x - 4.00".to_string()));
        assert_eq!(format_shift(-0.5), Some("xₛ = x + 0.50".to_string()));
        assert_eq!(format_shift(0.0), None);
    }
}
