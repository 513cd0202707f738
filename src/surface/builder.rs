//! Ergonomic builder API for smile surface construction.
//!
//! ```
//! use fxsmile::surface::{SmileSurface, TimeInterpolation, VolSurface};
//!
//! let surface = SmileSurface::builder()
//!     .name("smileEurUsd")
//!     .deltas(&[0.10, 0.25])
//!     .time_interpolation(TimeInterpolation::TimeSquare)
//!     .add_pillar(1.0, 0.17, &[-0.013, -0.008], &[0.033, 0.013])
//!     .add_pillar(0.5, 0.18, &[-0.012, -0.007], &[0.032, 0.012])
//!     .build()?;
//!
//! assert_eq!(surface.pillar_times(), vec![0.5, 1.0]);
//! let vol = surface.volatility(0.75, 1.45, 1.39)?;
//! assert!(vol.0 > 0.0);
//! # Ok::<(), fxsmile::FxVolError>(())
//! ```

use crate::error::{self, FxVolError};
use crate::interp::Interpolator1D;
use crate::smile::SmileSlice;
use crate::surface::delta::SmileSurface;
use crate::surface::interp::TimeInterpolation;

/// Builder for [`SmileSurface`] from per-pillar market quotes.
///
/// Pillars may be added in any order; [`build`](SmileSurfaceBuilder::build)
/// sorts them by expiry and rejects duplicates.
#[derive(Debug, Default)]
pub struct SmileSurfaceBuilder {
    name: Option<String>,
    deltas: Option<Vec<f64>>,
    time_interpolation: TimeInterpolation,
    strike_interpolation: Interpolator1D,
    pillars: Vec<PillarData>,
}

#[derive(Debug)]
enum PillarData {
    Quotes {
        time: f64,
        atm: f64,
        risk_reversals: Vec<f64>,
        strangles: Vec<f64>,
    },
    Slice(SmileSlice),
}

impl PillarData {
    fn into_slice(self, deltas: Option<&[f64]>) -> error::Result<SmileSlice> {
        match self {
            PillarData::Slice(slice) => Ok(slice),
            PillarData::Quotes {
                time,
                atm,
                risk_reversals,
                strangles,
            } => {
                let deltas = deltas.ok_or_else(|| {
                    FxVolError::invalid("deltas are required to build pillars from quotes")
                })?;
                SmileSlice::from_quotes(time, deltas.to_vec(), atm, &risk_reversals, &strangles)
            }
        }
    }
}

impl SmileSurfaceBuilder {
    /// Create a new builder (variance-linear in time, linear in strike).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the surface name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the delta grid shared by every quoted pillar.
    pub fn deltas(mut self, deltas: &[f64]) -> Self {
        self.deltas = Some(deltas.to_vec());
        self
    }

    /// Set the rule used between pillar expiries.
    pub fn time_interpolation(mut self, method: TimeInterpolation) -> Self {
        self.time_interpolation = method;
        self
    }

    /// Set the scheme used in strike.
    pub fn strike_interpolation(mut self, interpolator: Interpolator1D) -> Self {
        self.strike_interpolation = interpolator;
        self
    }

    /// Add a pillar from ATM, risk-reversal and strangle quotes.
    ///
    /// `risk_reversals` and `strangles` follow the order of
    /// [`deltas`](SmileSurfaceBuilder::deltas).
    pub fn add_pillar(
        mut self,
        time: f64,
        atm: f64,
        risk_reversals: &[f64],
        strangles: &[f64],
    ) -> Self {
        self.pillars.push(PillarData::Quotes {
            time,
            atm,
            risk_reversals: risk_reversals.to_vec(),
            strangles: strangles.to_vec(),
        });
        self
    }

    /// Add an already constructed pillar slice.
    pub fn add_slice(mut self, slice: SmileSlice) -> Self {
        self.pillars.push(PillarData::Slice(slice));
        self
    }

    /// Build the surface.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if the name is missing, quoted
    /// pillars were added without a delta grid, any pillar is invalid, or
    /// the pillars do not form a valid surface.
    pub fn build(self) -> error::Result<SmileSurface> {
        #[cfg(feature = "logging")]
        tracing::debug!(
            n_pillars = self.pillars.len(),
            time_interpolation = ?self.time_interpolation,
            strike_interpolation = ?self.strike_interpolation,
            "smile surface build started"
        );

        let name = self
            .name
            .ok_or_else(|| FxVolError::invalid("surface name is required"))?;
        let deltas = self.deltas;

        let mut slices = self
            .pillars
            .into_iter()
            .map(|p| p.into_slice(deltas.as_deref()))
            .collect::<error::Result<Vec<_>>>()?;
        slices.sort_by(|a, b| a.time().total_cmp(&b.time()));

        SmileSurface::new(
            name,
            slices,
            self.time_interpolation,
            self.strike_interpolation,
        )
    }
}
