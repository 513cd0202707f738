//! One-dimensional interpolation with flat extrapolation.
//!
//! Used to read a smile in strike space: the knots are the strikes derived
//! from the delta pillars and the values are the pillar volatilities. Knots
//! must be supplied pre-sorted and strictly increasing; this module never
//! reorders its input, so callers keep the index ↔ node correspondence.
//!
//! Outside `[x₀, xₙ₋₁]` every scheme returns the nearest end value.

use serde::{Deserialize, Serialize};

use crate::error::{self, FxVolError};

/// Interpolation scheme between knots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interpolator1D {
    /// Piecewise linear.
    #[default]
    Linear,
    /// Natural cubic spline (zero second derivative at both ends).
    ///
    /// Falls back to linear when fewer than 3 knots are given.
    NaturalCubicSpline,
}

impl Interpolator1D {
    /// Interpolate `y(x)` through the knots `(xs[i], ys[i])`.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if the knot arrays are empty,
    /// differ in length, contain non-finite values, or `xs` is not strictly
    /// increasing. Returns [`FxVolError::DomainError`] if `x` is not finite.
    ///
    /// # Examples
    /// ```
    /// use fxsmile::interp::Interpolator1D;
    ///
    /// let xs = [1.0, 2.0, 4.0];
    /// let ys = [0.2, 0.1, 0.3];
    /// let y = Interpolator1D::Linear.interpolate(&xs, &ys, 3.0)?;
    /// assert!((y - 0.2).abs() < 1e-15);
    /// // flat beyond the last knot
    /// assert_eq!(Interpolator1D::Linear.interpolate(&xs, &ys, 10.0)?, 0.3);
    /// # Ok::<(), fxsmile::FxVolError>(())
    /// ```
    pub fn interpolate(&self, xs: &[f64], ys: &[f64], x: f64) -> error::Result<f64> {
        let coefficients = self.prepare(xs, ys)?;
        evaluate(xs, ys, &coefficients, x)
    }

    /// Validate the knots and solve for the per-interval coefficients this
    /// scheme needs. Linear interpolation needs none.
    pub(crate) fn prepare(&self, xs: &[f64], ys: &[f64]) -> error::Result<Vec<SplineCoeff>> {
        validate_knots(xs, ys)?;
        Ok(self.coefficients(xs, ys))
    }

    /// Coefficients for knots that have already been validated.
    pub(crate) fn coefficients(&self, xs: &[f64], ys: &[f64]) -> Vec<SplineCoeff> {
        match self {
            Interpolator1D::NaturalCubicSpline if xs.len() >= 3 => spline_coefficients(xs, ys),
            _ => Vec::new(),
        }
    }
}

/// Evaluate through validated knots with coefficients from
/// [`Interpolator1D::prepare`]; an empty coefficient set reads linearly.
pub(crate) fn evaluate(
    xs: &[f64],
    ys: &[f64],
    coefficients: &[SplineCoeff],
    x: f64,
) -> error::Result<f64> {
    if !x.is_finite() {
        return Err(FxVolError::domain(format!(
            "interpolation abscissa must be finite, got {x}"
        )));
    }

    let n = xs.len();
    if x <= xs[0] {
        return Ok(ys[0]);
    }
    if x >= xs[n - 1] {
        return Ok(ys[n - 1]);
    }
    // Binary search for the interval [xs[i], xs[i+1]) containing x.
    let i = xs.partition_point(|&k| k <= x) - 1;

    match coefficients.get(i) {
        Some(s) => {
            let dx = x - xs[i];
            Ok(s.a + dx * (s.b + dx * (s.c + dx * s.d)))
        }
        None => {
            let w = (x - xs[i]) / (xs[i + 1] - xs[i]);
            Ok((1.0 - w) * ys[i] + w * ys[i + 1])
        }
    }
}

fn validate_knots(xs: &[f64], ys: &[f64]) -> error::Result<()> {
    if xs.is_empty() {
        return Err(FxVolError::invalid("interpolation requires at least one knot"));
    }
    if xs.len() != ys.len() {
        return Err(FxVolError::invalid(format!(
            "knot abscissas and values must have the same length, got {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(FxVolError::invalid("knots must be finite"));
    }
    for (i, w) in xs.windows(2).enumerate() {
        if w[1] <= w[0] {
            return Err(FxVolError::invalid(format!(
                "knots must be strictly increasing, but xs[{}]={} >= xs[{}]={}",
                i,
                w[0],
                i + 1,
                w[1]
            )));
        }
    }
    Ok(())
}

/// Coefficients for one cubic polynomial interval.
///
/// On \[xᵢ, xᵢ₊₁\]: `S(x) = a + b·(x - xᵢ) + c·(x - xᵢ)² + d·(x - xᵢ)³`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SplineCoeff {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

/// Solve the natural cubic spline tridiagonal system (Thomas algorithm) and
/// return per-interval coefficients. Requires at least 3 knots.
fn spline_coefficients(x: &[f64], y: &[f64]) -> Vec<SplineCoeff> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    // Second-derivative coefficients with c[0] = c[n-1] = 0.
    let mut c = vec![0.0; n];
    let m = n - 2;
    let mut diag = vec![0.0; m];
    let mut rhs = vec![0.0; m];
    for j in 0..m {
        let i = j + 1;
        diag[j] = 2.0 * (h[i - 1] + h[i]);
        rhs[j] = 3.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
    }
    for j in 1..m {
        let w = h[j] / diag[j - 1];
        diag[j] -= w * h[j];
        rhs[j] -= w * rhs[j - 1];
    }
    c[m] = rhs[m - 1] / diag[m - 1];
    for j in (0..m - 1).rev() {
        let i = j + 1;
        c[i] = (rhs[j] - h[j + 1] * c[i + 1]) / diag[j];
    }

    (0..n - 1)
        .map(|i| SplineCoeff {
            a: y[i],
            b: (y[i + 1] - y[i]) / h[i] - h[i] * (2.0 * c[i] + c[i + 1]) / 3.0,
            c: c[i],
            d: (c[i + 1] - c[i]) / (3.0 * h[i]),
        })
        .collect()
}
