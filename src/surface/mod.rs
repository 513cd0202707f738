//! Smile surfaces across expiry.
//!
//! A surface maps (expiry, strike, forward) → implied vol. The delta-quoted
//! [`SmileSurface`] stores one [`SmileSlice`](crate::smile::SmileSlice) per
//! pillar expiry, synthesizes intermediate expiries with a
//! [`TimeInterpolation`] rule and reads the result in strike space.
//!
//! Consumers ([`VolatilityProvider`](crate::provider::VolatilityProvider),
//! [`SensitivityProjector`](crate::sensitivity::SensitivityProjector)) only see
//! the [`VolSurface`] trait, so a differently parametrized smile can be
//! substituted without touching them.

pub mod builder;
pub mod delta;
pub(crate) mod interp;

pub use builder::SmileSurfaceBuilder;
pub use delta::SmileSurface;
pub use interp::TimeInterpolation;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error;
use crate::smile::StrikeSmile;
use crate::types::Vol;
use crate::validate::require_positive;

/// Identity of one surface node: its pillar expiry and its delta.
///
/// `delta` is expressed as call delta, so put-wing nodes carry `1 − δ`
/// and the ATM node carries 0.5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Index of the pillar, ascending in time.
    pub pillar: usize,
    /// Wing position within the pillar: put wing, ATM, call wing.
    pub position: usize,
    /// Pillar expiry as a year fraction.
    pub year_fraction: f64,
    /// Delta label of the node.
    pub delta: f64,
}

impl fmt::Display for NodeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}Y/{:.4}D", self.year_fraction, self.delta)
    }
}

/// A full FX volatility surface: (expiry, strike, forward) → vol.
///
/// Implementations must be `Send + Sync` and immutable: bumping a node
/// returns a new surface.
///
/// # Examples
///
/// ```
/// use fxsmile::surface::{SmileSurface, VolSurface};
///
/// let surface = SmileSurface::from_quotes(
///     "smileEurUsd",
///     &[0.5, 1.0],
///     vec![0.10, 0.25],
///     &[0.18, 0.17],
///     &[vec![-0.012, -0.007], vec![-0.013, -0.008]],
///     &[vec![0.032, 0.012], vec![0.033, 0.013]],
/// )?;
///
/// let vol = surface.volatility(0.75, 1.45, 1.39)?;
/// assert!(vol.0 > 0.0);
/// assert_eq!(surface.node_metadata().len(), 10);
/// # Ok::<(), fxsmile::FxVolError>(())
/// ```
pub trait VolSurface: Send + Sync + fmt::Debug {
    /// Identifier of the surface.
    fn name(&self) -> &str;

    /// The smile at `expiry` restated on a strike grid at `forward`.
    fn strike_smile(&self, expiry: f64, forward: f64) -> error::Result<StrikeSmile>;

    /// Every node, ordered by pillar then by wing position.
    fn node_metadata(&self) -> Vec<NodeMetadata>;

    /// A new surface with the volatility of `node` moved by `shift`.
    fn with_bumped_node(&self, node: &NodeMetadata, shift: f64) -> error::Result<Self>
    where
        Self: Sized;

    /// Black implied volatility at (expiry, strike, forward).
    fn volatility(&self, expiry: f64, strike: f64, forward: f64) -> error::Result<Vol> {
        require_positive(strike, "strike")?;
        self.strike_smile(expiry, forward)?.volatility(strike)
    }
}
