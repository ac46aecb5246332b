//! Closed-form regression over a [`Series`]
//!
//! Every estimator first calibrates the data: x values are shifted by `x_offset = x₀ - 1` and
//! y values by `y_offset = min(y) - 1`, so that the shifted coordinates are all at least 1.
//! This keeps logarithms defined and moves magnitudes away from catastrophic cancellation.
//! The offsets are stored in the resulting [`FitParameters`] and re-applied by
//! [`FitParameters::extrapolate`].
//!
//! | Method | Model | Estimator |
//! |---|---|---|
//! | [`Series::fit_linear`] | `m·x + b` | least squares from Σx, Σy, Σx², Σxy, Σy² |
//! | [`Series::fit_linear_through_origin`] | `m·x` | `Σxy / Σx²` |
//! | [`Series::fit_logarithmic`] | `A + B·ln(x)` | least squares on `ln(x)` |
//! | [`Series::fit_power`] | `A·x^B` | least squares on `ln(x)`, `ln(y)` |
//! | [`Series::fit_exponential`] | `A·e^(B·x)` | y-weighted least squares on `ln(y)` |
//! | [`Series::fit_polynomial`] | `Σ cᵢ·xⁱ` | normal equations, solved by [`crate::solver`] |
//! | [`Series::fit_gaussian_parabolic`] | `exp(a·x² + b·x + c)` | quadratic least squares on `ln(y)` |
//!
//! # Example
//! ```
//! # use seriesfit::Series;
//! let data = Series::from_fn(1.0..=9.0, 1.0, |x| x * x);
//! let fit = data.fit_polynomial(2).unwrap();
//! assert!((fit.extrapolate(10.0) - 100.0).abs() < 1e-6);
//! ```
use nalgebra::DMatrix;

use crate::{
    error::{Error, Result},
    solver, Series,
};

mod params;
pub use params::{extrapolate, FitKind, FitParameters, Model};

/// Polynomial orders at or above this are reported as likely ill-conditioned
const HIGH_ORDER: usize = 8;

/// Calibration offsets, and the shifted view of a series they produce
struct Calibration<'a> {
    series: &'a Series,
    x_offset: f64,
    y_offset: f64,
}
impl<'a> Calibration<'a> {
    fn new(series: &'a Series) -> Result<Self> {
        let Some(&first) = series.x().first() else {
            return Err(Error::NoData);
        };

        Ok(Self {
            series,
            x_offset: first - 1.0,
            y_offset: series.min() - 1.0,
        })
    }

    /// The samples in shifted coordinates
    fn shifted(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.series
            .iter()
            .map(|(x, y)| (x - self.x_offset, y - self.y_offset))
    }

    fn n(&self) -> usize {
        self.series.len()
    }

    fn params(&self, model: Model) -> FitParameters {
        FitParameters::new(model, self.x_offset, self.y_offset)
    }

    fn singular(&self, k: usize) -> Error {
        Error::SingularMatrix { n: self.n(), k }
    }
}

/// Natural logarithm of a shifted coordinate, or a domain error if it is not positive and finite.
fn ln_checked(value: f64, axis: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value.ln())
    } else {
        Err(Error::Domain(format!(
            "logarithm of shifted {axis} = {value}; values must be finite"
        )))
    }
}

/// Number of distinct x values in a non-empty series
fn distinct_x(series: &Series) -> usize {
    1 + series.x().windows(2).filter(|w| w[0] != w[1]).count()
}

impl Series {
    /// Fits `y = m·x + b` by least squares.
    ///
    /// Also computes the Pearson correlation of the data, stored in [`Model::Linear`].
    /// The correlation is NaN if every y value is identical.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// m = (N·Σxy - Σx·Σy) / (N·Σx² - (Σx)²)
    /// b = (Σy - m·Σx) / N
    /// r = (N·Σxy - Σx·Σy) / sqrt( (N·Σx² - (Σx)²) · (N·Σy² - (Σy)²) )
    /// ```
    /// </div>
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::SingularMatrix`] if every x value is identical.
    pub fn fit_linear(&self) -> Result<FitParameters> {
        let cal = Calibration::new(self)?;
        let n = cal.n() as f64;

        let (mut sx, mut sy, mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (x, y) in cal.shifted() {
            sx += x;
            sy += y;
            sxx += x * x;
            sxy += x * y;
            syy += y * y;
        }

        let denominator = n * sxx - sx * sx;
        if denominator == 0.0 {
            return Err(cal.singular(2));
        }

        let covariance = n * sxy - sx * sy;
        let gradient = covariance / denominator;
        let intercept = (sy - gradient * sx) / n;
        let correlation = covariance / (denominator * (n * syy - sy * sy)).sqrt();

        Ok(cal.params(Model::Linear {
            gradient,
            intercept,
            correlation,
        }))
    }

    /// Fits `y = m·x` (no intercept term, in shifted coordinates), with `m = Σxy / Σx²`.
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    pub fn fit_linear_through_origin(&self) -> Result<FitParameters> {
        let cal = Calibration::new(self)?;

        let (mut sxx, mut sxy) = (0.0, 0.0);
        for (x, y) in cal.shifted() {
            sxx += x * x;
            sxy += x * y;
        }

        if sxx == 0.0 {
            return Err(cal.singular(1));
        }

        Ok(cal.params(Model::LinearThroughOrigin {
            gradient: sxy / sxx,
        }))
    }

    /// Fits `y = A + B·ln(x)` by least squares on `ln(x)`.
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::Domain`] if a shifted x value is not finite.
    /// - [`Error::SingularMatrix`] if every x value is identical.
    pub fn fit_logarithmic(&self) -> Result<FitParameters> {
        let cal = Calibration::new(self)?;
        let n = cal.n() as f64;

        let (mut slx, mut sylx, mut sy, mut slx2) = (0.0, 0.0, 0.0, 0.0);
        for (x, y) in cal.shifted() {
            let lx = ln_checked(x, "x")?;
            slx += lx;
            sylx += y * lx;
            sy += y;
            slx2 += lx * lx;
        }

        let denominator = n * slx2 - slx * slx;
        if denominator == 0.0 {
            return Err(cal.singular(2));
        }

        let b = (n * sylx - sy * slx) / denominator;
        let a = (sy - b * slx) / n;
        Ok(cal.params(Model::Logarithmic { a, b }))
    }

    /// Fits `y = A·x^B` by least squares on `ln(x)` and `ln(y)`.
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::Domain`] if a shifted x or y value is not finite.
    /// - [`Error::SingularMatrix`] if every x value is identical.
    pub fn fit_power(&self) -> Result<FitParameters> {
        let cal = Calibration::new(self)?;
        let n = cal.n() as f64;

        let (mut slx, mut slxly, mut sly, mut slx2) = (0.0, 0.0, 0.0, 0.0);
        for (x, y) in cal.shifted() {
            let lx = ln_checked(x, "x")?;
            let ly = ln_checked(y, "y")?;
            slx += lx;
            slxly += lx * ly;
            sly += ly;
            slx2 += lx * lx;
        }

        let denominator = n * slx2 - slx * slx;
        if denominator == 0.0 {
            return Err(cal.singular(2));
        }

        let b = (n * slxly - sly * slx) / denominator;
        let a = ((sly - b * slx) / n).exp();
        Ok(cal.params(Model::Power { a, b }))
    }

    /// Fits `y = A·e^(B·x)`.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// Least squares on `ln(y)`, with each sample weighted by `y` to counter the
    /// compression of large values by the logarithm:
    ///
    /// ```math
    /// D = Σy · Σx²y - (Σxy)²
    /// ln(A) = (Σx²y · Σy·ln(y) - Σxy · Σxy·ln(y)) / D
    /// B     = (Σy · Σxy·ln(y) - Σxy · Σy·ln(y)) / D
    /// ```
    /// </div>
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::Domain`] if a shifted y value is not finite.
    /// - [`Error::SingularMatrix`] if `D` is zero (a single distinct x value).
    pub fn fit_exponential(&self) -> Result<FitParameters> {
        let cal = Calibration::new(self)?;

        let (mut sy, mut sxxy, mut syly, mut sxyly, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (x, y) in cal.shifted() {
            let ly = ln_checked(y, "y")?;
            sy += y;
            sxxy += x * x * y;
            syly += y * ly;
            sxyly += x * y * ly;
            sxy += x * y;
        }

        let denominator = sy * sxxy - sxy * sxy;
        if denominator == 0.0 {
            return Err(cal.singular(2));
        }

        let a = ((sxxy * syly - sxy * sxyly) / denominator).exp();
        let b = (sy * sxyly - sxy * syly) / denominator;
        Ok(cal.params(Model::Exponential { a, b }))
    }

    /// Fits a polynomial `y = Σ cᵢ·xⁱ` of the given order by least squares.
    ///
    /// Coefficients are lowest degree first, in shifted coordinates.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// Builds the `(k+1) x (k+1)` normal-equation system from power-sum moments
    ///
    /// ```math
    /// A[i][j] = Σ x^(i+j)
    /// b[i]    = Σ x^i · y
    /// ```
    ///
    /// and solves it with [`solver::solve_augmented`].
    /// The moments grow as `x^(2k)`, so high orders on wide x ranges are ill-conditioned.
    /// </div>
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::SingularMatrix`] if there are no more distinct x values than `order`,
    ///   or if the normal equations are numerically singular.
    pub fn fit_polynomial(&self, order: usize) -> Result<FitParameters> {
        let cal = Calibration::new(self)?;
        let k = order + 1;

        if distinct_x(self) <= order {
            return Err(cal.singular(k));
        }
        if order >= HIGH_ORDER {
            log::warn!("polynomial of order {order} requested; the normal equations may be ill-conditioned");
        }

        // Power sums Σx^p for p in 0..2k-1, and Σx^i·y for i in 0..k
        let mut power_sums = vec![0.0; 2 * k - 1];
        let mut moments = vec![0.0; k];
        for (x, y) in cal.shifted() {
            let mut power = 1.0;
            for (p, sum) in power_sums.iter_mut().enumerate() {
                if p < k {
                    moments[p] += power * y;
                }
                *sum += power;
                power *= x;
            }
        }

        let augmented = DMatrix::from_fn(k, k + 1, |i, j| {
            if j == k {
                moments[i]
            } else {
                power_sums[i + j]
            }
        });

        let coefficients = solver::solve_augmented(augmented).map_err(|e| match e {
            Error::SingularMatrix { k, .. } => cal.singular(k),
            e => e,
        })?;

        Ok(cal.params(Model::Polynomial(coefficients.iter().copied().collect())))
    }

    /// Jointly fits a Gaussian peak, returned in two equivalent forms.
    ///
    /// - [`Model::Gaussian`]: the quadratic `ln(y) = a·x² + b·x + c`.
    /// - [`Model::Parabolic`]: the same curve as `height`, `position` and `width`.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// The quadratic is solved in closed form from the moments Σx..Σx⁴, Σln(y), Σx·ln(y)
    /// and Σx²·ln(y) (Cramer's rule on the 3x3 normal equations, with determinant `D`). Then:
    ///
    /// ```math
    /// height   = exp(c - a·(b / 2a)²)
    /// position = -b / 2a
    /// width    = 2.35703 / (sqrt(2) · sqrt(-a))
    /// ```
    ///
    /// The width is only defined for a peak (`a < 0`). Otherwise it is NaN, and a warning is logged.
    /// </div>
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::Domain`] if a shifted y value is not finite.
    /// - [`Error::SingularMatrix`] if there are fewer than 3 distinct x values, or if `D` is
    ///   zero up to rounding.
    ///
    /// # Example
    /// ```
    /// # use seriesfit::{Series, Model};
    /// let peak = Series::from_fn(1.0..=9.0, 1.0, |x| (2.0 - (x - 5.0).powi(2) / 8.0).exp());
    /// let (_, parabolic) = peak.fit_gaussian_parabolic().unwrap();
    ///
    /// let Model::Parabolic { position, .. } = parabolic.model() else { unreachable!() };
    /// assert!((position + parabolic.x_offset() - 5.0).abs() < 1e-9);
    /// ```
    pub fn fit_gaussian_parabolic(&self) -> Result<(FitParameters, FitParameters)> {
        let cal = Calibration::new(self)?;
        if distinct_x(self) < 3 {
            return Err(cal.singular(3));
        }
        let n = cal.n() as f64;

        let (mut sx, mut sx2, mut sx3, mut sx4) = (0.0, 0.0, 0.0, 0.0);
        let (mut sy, mut sxy, mut sx2y) = (0.0, 0.0, 0.0);
        for (x, y) in cal.shifted() {
            let ly = ln_checked(y, "y")?;
            let x2 = x * x;
            sx += x;
            sx2 += x2;
            sx3 += x2 * x;
            sx4 += x2 * x2;
            sy += ly;
            sxy += x * ly;
            sx2y += x2 * ly;
        }

        let determinant = n * sx2 * sx4 + 2.0 * sx * sx2 * sx3
            - sx2.powi(3)
            - sx.powi(2) * sx4
            - n * sx3.powi(2);

        // Relative to the largest term, as in the solver's pivot check
        let scale = n * sx2 * sx4;
        if !(determinant.abs() > f64::EPSILON * 3.0 * scale) {
            return Err(cal.singular(3));
        }

        let a = (n * sx2 * sx2y + sx * sx3 * sy + sx * sx2 * sxy
            - sx2.powi(2) * sy
            - sx.powi(2) * sx2y
            - n * sx3 * sxy)
            / determinant;
        let b = (n * sx4 * sxy + sx * sx2 * sx2y + sx2 * sx3 * sy
            - sx2.powi(2) * sxy
            - sx * sx4 * sy
            - n * sx3 * sx2y)
            / determinant;
        let c = (sx2 * sx4 * sy + sx2 * sx3 * sxy + sx * sx3 * sx2y
            - sx2.powi(2) * sx2y
            - sx * sx4 * sxy
            - sx3.powi(2) * sy)
            / determinant;

        let position = -b / (2.0 * a);
        let height = (c - a * (b / (2.0 * a)).powi(2)).exp();
        let width = if a < 0.0 {
            2.357_03 / (std::f64::consts::SQRT_2 * (-a).sqrt())
        } else {
            log::warn!("gaussian fit has no peak (quadratic coefficient a = {a}); width is undefined");
            f64::NAN
        };

        Ok((
            cal.params(Model::Gaussian {
                a,
                b,
                c,
                determinant,
            }),
            cal.params(Model::Parabolic {
                height,
                position,
                width,
            }),
        ))
    }

    /// Fits the model of the given kind.
    ///
    /// `order` is only used by [`FitKind::Polynomial`].
    ///
    /// # Errors
    /// See the estimator for each kind.
    pub fn fit(&self, kind: FitKind, order: usize) -> Result<FitParameters> {
        match kind {
            FitKind::Linear => self.fit_linear(),
            FitKind::LinearThroughOrigin => self.fit_linear_through_origin(),
            FitKind::Logarithmic => self.fit_logarithmic(),
            FitKind::Power => self.fit_power(),
            FitKind::Exponential => self.fit_exponential(),
            FitKind::Polynomial => self.fit_polynomial(order),
            FitKind::Gaussian => Ok(self.fit_gaussian_parabolic()?.0),
            FitKind::Parabolic => Ok(self.fit_gaussian_parabolic()?.1),
        }
    }
}
