//! Delta-quoted smile for a single expiry.
//!
//! An FX smile is quoted at a small set of delta pillars: one at-the-money
//! volatility plus a risk reversal and a strangle per delta. [`SmileSlice`]
//! stores the resulting wing volatilities in the layout
//!
//! ```text
//! [put δ₀, put δ₁, …, put δₙ₋₁, ATM, call δₙ₋₁, …, call δ₁, call δ₀]
//! ```
//!
//! for ascending deltas δ₀ < δ₁ < … < δₙ₋₁ < 0.5. Because a low-delta put is
//! further out of the money than a high-delta put (and likewise for calls),
//! the strikes implied by this layout increase with the position index.
//!
//! # Quote convention
//!
//! ```text
//! put  = ATM − RR/2 + STR
//! call = ATM + RR/2 + STR
//! ```

use serde::{Deserialize, Serialize};

use crate::conventions::{atm_strike, strike_from_delta};
use crate::error::{self, FxVolError};
use crate::interp::Interpolator1D;
use crate::smile::StrikeSmile;
use crate::types::{OptionType, Vol};
use crate::validate::{require_positive, validate_finite, validate_positive};

/// Node label of the at-the-money position.
pub const ATM_DELTA_LABEL: f64 = 0.5;

/// Wing volatilities of one expiry, parametrized by delta.
///
/// Immutable: every bump returns a new slice.
///
/// # Examples
/// ```
/// use fxsmile::smile::SmileSlice;
///
/// let slice = SmileSlice::from_quotes(
///     1.0,
///     vec![0.10, 0.25],
///     0.17,
///     &[-0.013, -0.008],
///     &[0.033, 0.013],
/// )?;
/// assert_eq!(slice.vols().len(), 5);
/// assert_eq!(slice.atm(), 0.17);
///
/// let strikes = slice.strikes(1.39)?;
/// assert!(strikes.windows(2).all(|w| w[0] < w[1]));
/// let vol = slice.volatility_at(1.45, 1.39)?;
/// assert!(vol.0 > 0.0);
/// # Ok::<(), fxsmile::FxVolError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SmileSliceRaw", into = "SmileSliceRaw")]
pub struct SmileSlice {
    time: f64,
    deltas: Vec<f64>,
    vols: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct SmileSliceRaw {
    time: f64,
    deltas: Vec<f64>,
    vols: Vec<f64>,
}

impl TryFrom<SmileSliceRaw> for SmileSlice {
    type Error = FxVolError;
    fn try_from(raw: SmileSliceRaw) -> Result<Self, Self::Error> {
        Self::new(raw.time, raw.deltas, raw.vols)
    }
}

impl From<SmileSlice> for SmileSliceRaw {
    fn from(s: SmileSlice) -> Self {
        Self {
            time: s.time,
            deltas: s.deltas,
            vols: s.vols,
        }
    }
}

impl SmileSlice {
    /// Create a slice from wing-ordered volatilities.
    ///
    /// # Arguments
    /// * `time` — Time to expiry in years (must be > 0)
    /// * `deltas` — Strictly increasing deltas in (0, 0.5)
    /// * `vols` — `2·deltas.len() + 1` positive volatilities in wing order
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if any of the above is violated.
    pub fn new(time: f64, deltas: Vec<f64>, vols: Vec<f64>) -> error::Result<Self> {
        validate_positive(time, "time")?;
        validate_deltas(&deltas)?;
        if vols.len() != 2 * deltas.len() + 1 {
            return Err(FxVolError::invalid(format!(
                "expected {} vols for {} deltas, got {}",
                2 * deltas.len() + 1,
                deltas.len(),
                vols.len()
            )));
        }
        for (i, &v) in vols.iter().enumerate() {
            if !v.is_finite() || v <= 0.0 {
                return Err(FxVolError::invalid(format!(
                    "vols must be positive and finite, got vols[{i}]={v}"
                )));
            }
        }
        Ok(Self { time, deltas, vols })
    }

    /// Create a slice from ATM, risk-reversal and strangle quotes.
    ///
    /// `risk_reversals[j]` and `strangles[j]` are quoted at `deltas[j]`.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if the quote arrays do not match
    /// the delta grid or the implied wing vols are not positive.
    pub fn from_quotes(
        time: f64,
        deltas: Vec<f64>,
        atm: f64,
        risk_reversals: &[f64],
        strangles: &[f64],
    ) -> error::Result<Self> {
        let n = deltas.len();
        if risk_reversals.len() != n || strangles.len() != n {
            return Err(FxVolError::invalid(format!(
                "risk reversals ({}) and strangles ({}) must match the {} deltas",
                risk_reversals.len(),
                strangles.len(),
                n
            )));
        }
        validate_positive(atm, "atm vol")?;
        let mut vols = vec![0.0; 2 * n + 1];
        vols[n] = atm;
        for j in 0..n {
            let rr = validate_finite(risk_reversals[j], "risk reversal")?;
            let strangle = validate_finite(strangles[j], "strangle")?;
            vols[j] = atm - 0.5 * rr + strangle;
            vols[2 * n - j] = atm + 0.5 * rr + strangle;
        }
        Self::new(time, deltas, vols)
    }

    /// Time to expiry in years.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Delta pillars, ascending.
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// Wing-ordered volatilities.
    pub fn vols(&self) -> &[f64] {
        &self.vols
    }

    /// At-the-money volatility.
    pub fn atm(&self) -> f64 {
        self.vols[self.deltas.len()]
    }

    /// Risk reversal (call − put) at each delta pillar.
    pub fn risk_reversals(&self) -> Vec<f64> {
        let n = self.deltas.len();
        (0..n).map(|j| self.vols[2 * n - j] - self.vols[j]).collect()
    }

    /// Strangle (wing average − ATM) at each delta pillar.
    pub fn strangles(&self) -> Vec<f64> {
        let n = self.deltas.len();
        (0..n)
            .map(|j| 0.5 * (self.vols[2 * n - j] + self.vols[j]) - self.atm())
            .collect()
    }

    /// Node label of every wing position, expressed as call delta:
    /// `1 − δ` on the put wing, 0.5 at the money, `δ` on the call wing.
    pub fn delta_labels(&self) -> Vec<f64> {
        let n = self.deltas.len();
        let mut labels = vec![ATM_DELTA_LABEL; 2 * n + 1];
        for (j, &d) in self.deltas.iter().enumerate() {
            labels[j] = 1.0 - d;
            labels[2 * n - j] = d;
        }
        labels
    }

    /// A copy with the volatility at `position` moved by `shift`.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if `position` is out of range or
    /// the shifted vol is not positive.
    pub fn with_shifted_vol(&self, position: usize, shift: f64) -> error::Result<Self> {
        if position >= self.vols.len() {
            return Err(FxVolError::invalid(format!(
                "wing position {position} out of range for {} vols",
                self.vols.len()
            )));
        }
        let mut vols = self.vols.clone();
        vols[position] += shift;
        Self::new(self.time, self.deltas.clone(), vols)
    }

    /// A copy with every volatility moved by `shift`.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if a shifted vol is not positive.
    pub fn with_parallel_shift(&self, shift: f64) -> error::Result<Self> {
        let vols = self.vols.iter().map(|v| v + shift).collect();
        Self::new(self.time, self.deltas.clone(), vols)
    }

    /// Strikes of every wing position at `forward`, increasing with index.
    ///
    /// Puts and calls are inverted from their Black forward delta; the ATM
    /// position uses the delta-neutral straddle strike.
    ///
    /// # Errors
    /// Returns [`FxVolError::DomainError`] if `forward` is non-positive or a
    /// derived strike is non-positive.
    pub fn strikes(&self, forward: f64) -> error::Result<Vec<f64>> {
        require_positive(forward, "forward")?;
        let n = self.deltas.len();
        let mut strikes = vec![0.0; 2 * n + 1];
        strikes[n] = atm_strike(forward, self.time, self.vols[n])?;
        for (j, &d) in self.deltas.iter().enumerate() {
            strikes[j] = strike_from_delta(d, OptionType::Put, forward, self.time, self.vols[j])?;
            strikes[2 * n - j] = strike_from_delta(
                d,
                OptionType::Call,
                forward,
                self.time,
                self.vols[2 * n - j],
            )?;
        }
        Ok(strikes)
    }

    /// This smile in strike space at `forward`, read linearly in strike.
    ///
    /// # Errors
    /// Returns [`FxVolError::DomainError`] if the derived strikes are invalid
    /// or not strictly increasing.
    pub fn strike_smile(&self, forward: f64) -> error::Result<StrikeSmile> {
        StrikeSmile::new(
            self.strikes(forward)?,
            self.vols.clone(),
            Interpolator1D::Linear,
        )
    }

    /// Volatility at `strike` for `forward`: linear in strike between the
    /// derived strikes, flat beyond them.
    ///
    /// # Errors
    /// Returns [`FxVolError::DomainError`] for a non-positive strike or
    /// forward, or an invalid derived strike grid.
    pub fn volatility_at(&self, strike: f64, forward: f64) -> error::Result<Vol> {
        require_positive(strike, "strike")?;
        self.strike_smile(forward)?.volatility(strike)
    }
}

fn validate_deltas(deltas: &[f64]) -> error::Result<()> {
    for (i, &d) in deltas.iter().enumerate() {
        if !d.is_finite() || d <= 0.0 || d >= 0.5 {
            return Err(FxVolError::invalid(format!(
                "deltas must lie in (0, 0.5), got deltas[{i}]={d}"
            )));
        }
    }
    for (i, w) in deltas.windows(2).enumerate() {
        if w[1] <= w[0] {
            return Err(FxVolError::invalid(format!(
                "deltas must be strictly increasing, but deltas[{}]={} >= deltas[{}]={}",
                i,
                w[0],
                i + 1,
                w[1]
            )));
        }
    }
    Ok(())
}
