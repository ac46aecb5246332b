//! Fitted model parameters and their evaluation
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    display::{self, EquationDisplay, Sign, Term, SHIFTED_X},
    error::{Error, Result},
    Series,
};

/// `2.35703 / sqrt(2)`: maps a Gaussian width back to the curvature of its log-quadratic.
const WIDTH_FACTOR: f64 = 2.357_03 / std::f64::consts::SQRT_2;

/// The closed-form models a [`Series`] can be fitted to.
///
/// Each kind has a stable string tag, used for serialization and by [`FitParameters::from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitKind {
    /// `y = m·x + b`
    Linear,

    /// `y = m·x`
    LinearThroughOrigin,

    /// `y = A + B·ln(x)`
    Logarithmic,

    /// `y = A·x^B`
    Power,

    /// `y = A·e^(B·x)`
    Exponential,

    /// `y = Σ cᵢ·xⁱ`
    Polynomial,

    /// `y = exp(a·x² + b·x + c)`
    Gaussian,

    /// `y = height·exp(-((x - position)·K / width)²)`
    Parabolic,
}
impl FitKind {
    /// Every kind, in declaration order
    pub const ALL: [FitKind; 8] = [
        Self::Linear,
        Self::LinearThroughOrigin,
        Self::Logarithmic,
        Self::Power,
        Self::Exponential,
        Self::Polynomial,
        Self::Gaussian,
        Self::Parabolic,
    ];

    /// Returns the stable string tag of this kind.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::LinearThroughOrigin => "linear_through_origin",
            Self::Logarithmic => "logarithmic",
            Self::Power => "power",
            Self::Exponential => "exponential",
            Self::Polynomial => "polynomial",
            Self::Gaussian => "gaussian",
            Self::Parabolic => "parabolic",
        }
    }
}
impl fmt::Display for FitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}
impl FromStr for FitKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| Error::UnsupportedFit(format!("unknown fit kind '{s}'")))
    }
}

/// Coefficients of a fitted model, in the shifted coordinates `x - x_offset`.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    /// `m·x + b`, with the Pearson correlation of the fitted data
    Linear {
        /// Slope
        gradient: f64,
        /// Value at shifted x = 0
        intercept: f64,
        /// Pearson correlation coefficient; NaN if either coordinate is constant
        correlation: f64,
    },

    /// `m·x`
    LinearThroughOrigin {
        /// Slope
        gradient: f64,
    },

    /// `A + B·ln(x)`
    Logarithmic {
        /// Constant term
        a: f64,
        /// Coefficient of `ln(x)`
        b: f64,
    },

    /// `A·x^B`
    Power {
        /// Scale
        a: f64,
        /// Exponent
        b: f64,
    },

    /// `A·e^(B·x)`
    Exponential {
        /// Scale
        a: f64,
        /// Rate
        b: f64,
    },

    /// `Σ cᵢ·xⁱ`, lowest degree first
    Polynomial(Vec<f64>),

    /// `exp(a·x² + b·x + c)`: a quadratic in `ln(y)`
    Gaussian {
        /// Quadratic coefficient; negative for a peak
        a: f64,
        /// Linear coefficient
        b: f64,
        /// Constant coefficient
        c: f64,
        /// Determinant of the moment system the quadratic was solved from
        determinant: f64,
    },

    /// The same peak as [`Model::Gaussian`], in peak form
    Parabolic {
        /// Peak height
        height: f64,
        /// Shifted x of the peak
        position: f64,
        /// Full width of the peak; NaN if the quadratic has no concavity
        width: f64,
    },
}

impl Model {
    /// The kind of this model
    #[must_use]
    pub fn kind(&self) -> FitKind {
        match self {
            Self::Linear { .. } => FitKind::Linear,
            Self::LinearThroughOrigin { .. } => FitKind::LinearThroughOrigin,
            Self::Logarithmic { .. } => FitKind::Logarithmic,
            Self::Power { .. } => FitKind::Power,
            Self::Exponential { .. } => FitKind::Exponential,
            Self::Polynomial(_) => FitKind::Polynomial,
            Self::Gaussian { .. } => FitKind::Gaussian,
            Self::Parabolic { .. } => FitKind::Parabolic,
        }
    }

    /// Evaluates the model at a shifted x value
    fn evaluate(&self, x: f64) -> f64 {
        match *self {
            Self::Linear {
                gradient,
                intercept,
                ..
            } => gradient * x + intercept,
            Self::LinearThroughOrigin { gradient } => gradient * x,
            Self::Logarithmic { a, b } => a + b * x.ln(),
            Self::Power { a, b } => a * x.powf(b),
            Self::Exponential { a, b } => a * (b * x).exp(),
            Self::Polynomial(ref coefficients) => coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, &c| acc * x + c),
            Self::Gaussian { a, b, c, .. } => (a * x * x + b * x + c).exp(),
            Self::Parabolic {
                height,
                position,
                width,
            } => height * (-((x - position) * WIDTH_FACTOR / width).powi(2)).exp(),
        }
    }

    fn coefficients(&self) -> Vec<f64> {
        match *self {
            Self::Linear {
                gradient,
                intercept,
                correlation,
            } => vec![gradient, intercept, correlation],
            Self::LinearThroughOrigin { gradient } => vec![gradient],
            Self::Logarithmic { a, b } | Self::Power { a, b } | Self::Exponential { a, b } => {
                vec![a, b]
            }
            Self::Polynomial(ref coefficients) => coefficients.clone(),
            Self::Gaussian {
                a,
                b,
                c,
                determinant,
            } => vec![a, b, c, determinant],
            Self::Parabolic {
                height,
                position,
                width,
            } => vec![height, position, width],
        }
    }

    fn from_coefficients(kind: FitKind, coefficients: &[f64]) -> Option<Self> {
        Some(match (kind, coefficients) {
            (FitKind::Linear, &[gradient, intercept, correlation]) => Self::Linear {
                gradient,
                intercept,
                correlation,
            },
            (FitKind::LinearThroughOrigin, &[gradient]) => Self::LinearThroughOrigin { gradient },
            (FitKind::Logarithmic, &[a, b]) => Self::Logarithmic { a, b },
            (FitKind::Power, &[a, b]) => Self::Power { a, b },
            (FitKind::Exponential, &[a, b]) => Self::Exponential { a, b },
            (FitKind::Polynomial, coefficients) if !coefficients.is_empty() => {
                Self::Polynomial(coefficients.to_vec())
            }
            (FitKind::Gaussian, &[a, b, c, determinant]) => Self::Gaussian {
                a,
                b,
                c,
                determinant,
            },
            (FitKind::Parabolic, &[height, position, width]) => Self::Parabolic {
                height,
                position,
                width,
            },
            _ => return None,
        })
    }
}

/// The immutable result of a regression.
///
/// Holds the fitted [`Model`] along with the calibration offsets that were subtracted from
/// the data before fitting. Evaluation re-applies them: `y(x) = model(x - x_offset) + y_offset`.
///
/// Serializes as `{ "kind": "<tag>", "coefficients": [...], "x_offset": .., "y_offset": .. }`,
/// with the coefficient layout of [`FitParameters::coefficients`].
///
/// # Example
/// ```
/// # use seriesfit::{Series, FitKind};
/// let data = Series::from_fn(0.0..=10.0, 1.0, |x| 2.0 * x + 3.0);
/// let fit = data.fit_linear().unwrap();
///
/// assert_eq!(fit.kind(), FitKind::Linear);
/// assert!((fit.extrapolate(20.0) - 43.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FitParts", into = "FitParts")]
pub struct FitParameters {
    model: Model,
    x_offset: f64,
    y_offset: f64,
}

#[derive(Serialize, Deserialize)]
struct FitParts {
    kind: FitKind,
    coefficients: Vec<f64>,
    x_offset: f64,
    y_offset: f64,
}

impl TryFrom<FitParts> for FitParameters {
    type Error = Error;

    fn try_from(value: FitParts) -> Result<Self> {
        Self::from_parts(
            value.kind.tag(),
            &value.coefficients,
            value.x_offset,
            value.y_offset,
        )
    }
}

impl From<FitParameters> for FitParts {
    fn from(value: FitParameters) -> Self {
        Self {
            kind: value.kind(),
            coefficients: value.coefficients(),
            x_offset: value.x_offset,
            y_offset: value.y_offset,
        }
    }
}

impl FitParameters {
    pub(crate) fn new(model: Model, x_offset: f64, y_offset: f64) -> Self {
        Self {
            model,
            x_offset,
            y_offset,
        }
    }

    /// Rebuilds fit parameters from a kind tag and a flat coefficient vector.
    ///
    /// Coefficient layouts, by kind:
    /// - `linear`: `[gradient, intercept, correlation]`
    /// - `linear_through_origin`: `[gradient]`
    /// - `logarithmic`, `power`, `exponential`: `[A, B]`
    /// - `polynomial`: `[c₀, c₁, ..., cₖ]` (at least one)
    /// - `gaussian`: `[a, b, c, determinant]`
    /// - `parabolic`: `[height, position, width]`
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedFit`] if the tag is unknown or the number of
    /// coefficients does not match the kind.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::FitParameters;
    /// let fit = FitParameters::from_parts("polynomial", &[1.0, 0.0, 2.0], 0.0, 0.0).unwrap();
    /// assert_eq!(fit.extrapolate(3.0), 19.0);
    ///
    /// assert!(FitParameters::from_parts("cubic_spline", &[1.0], 0.0, 0.0).is_err());
    /// assert!(FitParameters::from_parts("power", &[1.0], 0.0, 0.0).is_err());
    /// ```
    pub fn from_parts(
        tag: &str,
        coefficients: &[f64],
        x_offset: f64,
        y_offset: f64,
    ) -> Result<Self> {
        let kind: FitKind = tag.parse()?;
        let model = Model::from_coefficients(kind, coefficients).ok_or_else(|| {
            Error::UnsupportedFit(format!(
                "{} coefficients do not match the layout of a {kind} fit",
                coefficients.len()
            ))
        })?;
        Ok(Self::new(model, x_offset, y_offset))
    }

    /// The kind of the fitted model
    #[must_use]
    pub fn kind(&self) -> FitKind {
        self.model.kind()
    }

    /// The fitted model, in shifted coordinates
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The coefficients of the fitted model as a flat vector.
    ///
    /// See [`FitParameters::from_parts`] for the layout of each kind.
    #[must_use]
    pub fn coefficients(&self) -> Vec<f64> {
        self.model.coefficients()
    }

    /// Offset subtracted from x before the model is evaluated
    #[must_use]
    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    /// Offset added to the model's output
    #[must_use]
    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    /// Evaluates the fitted model at `x`.
    ///
    /// Out-of-domain inputs are not masked: for example a logarithmic fit evaluated left of
    /// its x offset returns NaN.
    #[must_use]
    pub fn extrapolate(&self, x: f64) -> f64 {
        self.model.evaluate(x - self.x_offset) + self.y_offset
    }

    /// Evaluates the fitted model at every x value of `series`.
    #[must_use]
    pub fn solution(&self, series: &Series) -> Series {
        let x = series.x().to_vec();
        let y = x.iter().map(|&x| self.extrapolate(x)).collect();
        Series::from_validated(x, y)
    }

    /// Coefficient of determination (R²) of this fit against `series`.
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if `series` is empty.
    pub fn r_squared(&self, series: &Series) -> Result<f64> {
        series.coefficient_of_determination(&self.solution(series))
    }

    /// Formats the fitted equation as a string.
    ///
    /// See [`EquationDisplay::format_equation`].
    #[must_use]
    pub fn equation(&self) -> String {
        self.to_string()
    }
}

fn inline(value: f64) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };
    let body = display::format_coefficient(value, 0, display::DEFAULT_PRECISION)
        .unwrap_or_else(|| "0".to_string());
    format!("{sign}{body}")
}

fn render_terms(terms: Vec<Term>) -> String {
    let mut buffer = String::new();
    // Writing into a String cannot fail
    let _ = display::write_terms(&mut buffer, terms);
    buffer
}

impl EquationDisplay for FitParameters {
    fn terms(&self) -> Vec<Term> {
        let x = SHIFTED_X;
        let mut terms = match &self.model {
            Model::Linear {
                gradient,
                intercept,
                ..
            } => display::polynomial_terms(&[*intercept, *gradient], x),
            Model::LinearThroughOrigin { gradient } => {
                Term::scaled(*gradient, x).into_iter().collect()
            }
            Model::Logarithmic { a, b } => [Term::scaled(*b, &format!("ln({x})")), Term::scaled(*a, "")]
                .into_iter()
                .flatten()
                .collect(),
            Model::Power { a, b } => Term::scaled(*a, &format!("{x}^{}", inline(*b)))
                .into_iter()
                .collect(),
            Model::Exponential { a, b } => {
                let exponent = render_terms(display::polynomial_terms(&[0.0, *b], x));
                Term::scaled(*a, &format!("e^({exponent})")).into_iter().collect()
            }
            Model::Polynomial(coefficients) => display::polynomial_terms(coefficients, x),
            Model::Gaussian { a, b, c, .. } => {
                let exponent = render_terms(display::polynomial_terms(&[*c, *b, *a], x));
                vec![Term::new(Sign::Positive, format!("exp({exponent})"))]
            }
            Model::Parabolic {
                height,
                position,
                width,
            } => {
                let centered =
                    render_terms(display::polynomial_terms(&[-*position, 1.0], x));
                let scale = inline(WIDTH_FACTOR / width);
                Term::scaled(*height, &format!("exp(-({scale}({centered}))²)"))
                    .into_iter()
                    .collect()
            }
        };

        terms.extend(Term::scaled(self.y_offset, ""));
        terms
    }

    fn format_scaling_formula(&self) -> Option<String> {
        display::format_shift(self.x_offset)
    }
}

impl fmt::Display for FitParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.kind())?;
        self.format_equation(f)
    }
}

/// Evaluates `params` at `x`.
///
/// Free-function form of [`FitParameters::extrapolate`].
#[must_use]
pub fn extrapolate(params: &FitParameters, x: f64) -> f64 {
    params.extrapolate(x)
}
