//! Delta-quoted smile surface with time and strike interpolation.
//!
//! Pillars are [`SmileSlice`]s at strictly increasing expiries sharing the
//! same number of delta pillars. A query at (t, K, F):
//!
//! 1. synthesizes the slice at `t` (stored pillar if `t` hits one, otherwise
//!    per-position interpolation between the bracketing pillars, flat outside);
//! 2. converts that slice's deltas to strikes at `F`;
//! 3. interpolates vol in strike, flat beyond the wing strikes.

use serde::{Deserialize, Serialize};

use crate::error::{self, FxVolError};
use crate::interp::Interpolator1D;
use crate::smile::{SmileSlice, StrikeSmile};
use crate::surface::builder::SmileSurfaceBuilder;
use crate::surface::interp::{TimeInterpolation, interpolate_slice};
use crate::surface::{NodeMetadata, VolSurface};
use crate::validate::{require_positive, validate_finite};

/// Term structure of delta-quoted FX smiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SmileSurfaceRaw", into = "SmileSurfaceRaw")]
pub struct SmileSurface {
    name: String,
    slices: Vec<SmileSlice>,
    time_interpolation: TimeInterpolation,
    strike_interpolation: Interpolator1D,
}

#[derive(Serialize, Deserialize)]
struct SmileSurfaceRaw {
    name: String,
    slices: Vec<SmileSlice>,
    #[serde(default)]
    time_interpolation: TimeInterpolation,
    #[serde(default)]
    strike_interpolation: Interpolator1D,
}

impl TryFrom<SmileSurfaceRaw> for SmileSurface {
    type Error = FxVolError;
    fn try_from(raw: SmileSurfaceRaw) -> Result<Self, Self::Error> {
        Self::new(
            raw.name,
            raw.slices,
            raw.time_interpolation,
            raw.strike_interpolation,
        )
    }
}

impl From<SmileSurface> for SmileSurfaceRaw {
    fn from(s: SmileSurface) -> Self {
        Self {
            name: s.name,
            slices: s.slices,
            time_interpolation: s.time_interpolation,
            strike_interpolation: s.strike_interpolation,
        }
    }
}

impl SmileSurface {
    /// Create a surface from pillar slices.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if `name` is empty, no slice is
    /// given, pillar times are not strictly increasing, or the slices do not
    /// all have the same number of deltas.
    pub fn new(
        name: impl Into<String>,
        slices: Vec<SmileSlice>,
        time_interpolation: TimeInterpolation,
        strike_interpolation: Interpolator1D,
    ) -> error::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(FxVolError::invalid("surface name must not be empty"));
        }
        if slices.is_empty() {
            return Err(FxVolError::invalid("at least one pillar is required"));
        }
        for w in slices.windows(2) {
            if w[1].time() <= w[0].time() {
                return Err(FxVolError::invalid(format!(
                    "pillar times must be strictly increasing, but {} >= {}",
                    w[0].time(),
                    w[1].time()
                )));
            }
        }
        let n_deltas = slices[0].deltas().len();
        if let Some(bad) = slices.iter().find(|s| s.deltas().len() != n_deltas) {
            return Err(FxVolError::invalid(format!(
                "all pillars must share the delta grid cardinality {n_deltas}, pillar at {} has {}",
                bad.time(),
                bad.deltas().len()
            )));
        }

        #[cfg(feature = "logging")]
        tracing::debug!(
            name = %name,
            n_pillars = slices.len(),
            n_deltas,
            ?time_interpolation,
            ?strike_interpolation,
            "smile surface constructed"
        );

        Ok(Self {
            name,
            slices,
            time_interpolation,
            strike_interpolation,
        })
    }

    /// Create a surface from pillar slices with the default interpolation
    /// (variance-linear in time, linear in strike).
    ///
    /// # Errors
    /// See [`SmileSurface::new`].
    pub fn from_slices(name: impl Into<String>, slices: Vec<SmileSlice>) -> error::Result<Self> {
        Self::new(
            name,
            slices,
            TimeInterpolation::default(),
            Interpolator1D::default(),
        )
    }

    /// Create a surface from market quotes indexed by pillar.
    ///
    /// `risk_reversals[i][j]` and `strangles[i][j]` are quoted at pillar
    /// `times[i]` and `deltas[j]`.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if the quote arrays do not match
    /// the pillar and delta grids, or on any [`SmileSurface::new`] failure.
    pub fn from_quotes(
        name: impl Into<String>,
        times: &[f64],
        deltas: Vec<f64>,
        atm: &[f64],
        risk_reversals: &[Vec<f64>],
        strangles: &[Vec<f64>],
    ) -> error::Result<Self> {
        let n = times.len();
        if atm.len() != n || risk_reversals.len() != n || strangles.len() != n {
            return Err(FxVolError::invalid(format!(
                "expected {n} rows of ATM ({}), risk reversal ({}) and strangle ({}) quotes",
                atm.len(),
                risk_reversals.len(),
                strangles.len()
            )));
        }
        let slices = (0..n)
            .map(|i| {
                SmileSlice::from_quotes(
                    times[i],
                    deltas.clone(),
                    atm[i],
                    &risk_reversals[i],
                    &strangles[i],
                )
            })
            .collect::<error::Result<Vec<_>>>()?;
        Self::from_slices(name, slices)
    }

    /// Start a [`SmileSurfaceBuilder`].
    pub fn builder() -> SmileSurfaceBuilder {
        SmileSurfaceBuilder::new()
    }

    /// Pillar slices, ascending in time.
    pub fn slices(&self) -> &[SmileSlice] {
        &self.slices
    }

    /// Pillar expiries as year fractions.
    pub fn pillar_times(&self) -> Vec<f64> {
        self.slices.iter().map(SmileSlice::time).collect()
    }

    /// Rule used between pillar expiries.
    pub fn time_interpolation(&self) -> TimeInterpolation {
        self.time_interpolation
    }

    /// Scheme used in strike.
    pub fn strike_interpolation(&self) -> Interpolator1D {
        self.strike_interpolation
    }

    /// Number of nodes (pillars × wing positions).
    pub fn parameter_count(&self) -> usize {
        self.slices.iter().map(|s| s.vols().len()).sum()
    }

    /// The smile at `expiry`.
    ///
    /// Returns the stored pillar unchanged when `expiry` matches a pillar
    /// time; otherwise synthesizes a new slice.
    ///
    /// # Errors
    /// Returns [`FxVolError::DomainError`] if `expiry` is not positive.
    pub fn slice_at_time(&self, expiry: f64) -> error::Result<SmileSlice> {
        require_positive(expiry, "expiry")?;
        interpolate_slice(&self.slices, expiry, self.time_interpolation)
    }

    /// A new surface with every node moved by `shift`.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if `shift` is not finite or a
    /// shifted vol is not positive.
    pub fn shifted_by(&self, shift: f64) -> error::Result<Self> {
        validate_finite(shift, "shift")?;
        let slices = self
            .slices
            .iter()
            .map(|s| s.with_parallel_shift(shift))
            .collect::<error::Result<Vec<_>>>()?;
        Ok(self.with_slices(slices))
    }
}

impl SmileSurface {
    fn with_slices(&self, slices: Vec<SmileSlice>) -> Self {
        Self {
            name: self.name.clone(),
            slices,
            time_interpolation: self.time_interpolation,
            strike_interpolation: self.strike_interpolation,
        }
    }
}

impl VolSurface for SmileSurface {
    fn name(&self) -> &str {
        &self.name
    }

    fn strike_smile(&self, expiry: f64, forward: f64) -> error::Result<StrikeSmile> {
        let smile = self.slice_at_time(expiry)?.strike_smile(forward)?;
        Ok(smile.with_interpolator(self.strike_interpolation))
    }

    fn node_metadata(&self) -> Vec<NodeMetadata> {
        self.slices
            .iter()
            .enumerate()
            .flat_map(|(pillar, slice)| {
                let year_fraction = slice.time();
                slice
                    .delta_labels()
                    .into_iter()
                    .enumerate()
                    .map(move |(position, delta)| NodeMetadata {
                        pillar,
                        position,
                        year_fraction,
                        delta,
                    })
            })
            .collect()
    }

    fn with_bumped_node(&self, node: &NodeMetadata, shift: f64) -> error::Result<Self> {
        let slice = self.slices.get(node.pillar).ok_or_else(|| {
            FxVolError::invalid(format!(
                "pillar {} out of range for {} pillars",
                node.pillar,
                self.slices.len()
            ))
        })?;
        let bumped = slice.with_shifted_vol(node.position, shift)?;
        let mut slices = self.slices.clone();
        slices[node.pillar] = bumped;
        Ok(self.with_slices(slices))
    }
}
