//! A smile restated in strike space.
//!
//! [`StrikeSmile`] is what a delta-quoted slice becomes once a forward is
//! fixed: a strictly increasing strike grid paired with the wing-ordered
//! volatilities, read through a 1-D interpolator with flat extrapolation.

use serde::{Deserialize, Serialize};

use crate::error::{self, FxVolError};
use crate::interp::{self, Interpolator1D, SplineCoeff};
use crate::types::Vol;
use crate::validate::require_positive;

/// Strike grid and volatilities of one expiry at a fixed forward.
///
/// Spline coefficients are solved once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrikeSmileRaw", into = "StrikeSmileRaw")]
pub struct StrikeSmile {
    strikes: Vec<f64>,
    vols: Vec<f64>,
    interpolator: Interpolator1D,
    coefficients: Vec<SplineCoeff>,
}

#[derive(Serialize, Deserialize)]
struct StrikeSmileRaw {
    strikes: Vec<f64>,
    vols: Vec<f64>,
    interpolator: Interpolator1D,
}

impl TryFrom<StrikeSmileRaw> for StrikeSmile {
    type Error = FxVolError;
    fn try_from(raw: StrikeSmileRaw) -> Result<Self, Self::Error> {
        Self::new(raw.strikes, raw.vols, raw.interpolator)
    }
}

impl From<StrikeSmile> for StrikeSmileRaw {
    fn from(s: StrikeSmile) -> Self {
        Self {
            strikes: s.strikes,
            vols: s.vols,
            interpolator: s.interpolator,
        }
    }
}

impl StrikeSmile {
    /// Create a strike-space smile.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if the arrays are empty or differ
    /// in length, and [`FxVolError::DomainError`] if a strike is
    /// non-positive or the strikes are not strictly increasing.
    pub fn new(
        strikes: Vec<f64>,
        vols: Vec<f64>,
        interpolator: Interpolator1D,
    ) -> error::Result<Self> {
        if strikes.is_empty() || strikes.len() != vols.len() {
            return Err(FxVolError::invalid(format!(
                "strike smile needs matching non-empty strikes and vols, got {} and {}",
                strikes.len(),
                vols.len()
            )));
        }
        for &k in &strikes {
            require_positive(k, "derived strike")?;
        }
        for (i, w) in strikes.windows(2).enumerate() {
            if w[1] <= w[0] {
                return Err(FxVolError::domain(format!(
                    "derived strikes must be strictly increasing, but strikes[{}]={} >= strikes[{}]={}",
                    i,
                    w[0],
                    i + 1,
                    w[1]
                )));
            }
        }
        let coefficients = interpolator.prepare(&strikes, &vols)?;
        Ok(Self {
            strikes,
            vols,
            interpolator,
            coefficients,
        })
    }

    /// Strike grid, one strike per wing position.
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Volatilities, one per wing position.
    pub fn vols(&self) -> &[f64] {
        &self.vols
    }

    /// The interpolation scheme in strike.
    pub fn interpolator(&self) -> Interpolator1D {
        self.interpolator
    }

    /// The same smile read through a different interpolation scheme.
    #[must_use]
    pub fn with_interpolator(mut self, interpolator: Interpolator1D) -> Self {
        self.coefficients = interpolator.coefficients(&self.strikes, &self.vols);
        self.interpolator = interpolator;
        self
    }

    /// Volatility at `strike`, flat beyond the grid ends.
    ///
    /// # Errors
    /// Returns [`FxVolError::DomainError`] if `strike` is non-positive.
    pub fn volatility(&self, strike: f64) -> error::Result<Vol> {
        require_positive(strike, "strike")?;
        interp::evaluate(&self.strikes, &self.vols, &self.coefficients, strike).map(Vol)
    }

    /// A copy with the strike at `position` moved by `shift`, vols unchanged.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if `position` is out of range and
    /// [`FxVolError::DomainError`] if the shift breaks strike ordering.
    pub fn with_shifted_strike(&self, position: usize, shift: f64) -> error::Result<Self> {
        if position >= self.strikes.len() {
            return Err(FxVolError::invalid(format!(
                "strike position {position} out of range for {} strikes",
                self.strikes.len()
            )));
        }
        let mut strikes = self.strikes.clone();
        strikes[position] += shift;
        Self::new(strikes, self.vols.clone(), self.interpolator)
    }
}
