//! Projection of a point volatility sensitivity onto surface nodes.
//!
//! A pricer reports `∂V/∂σ` at the single (expiry, strike, forward) at which
//! it read the surface. [`SensitivityProjector`] redistributes that number
//! over the discrete surface nodes.
//!
//! # Algorithm
//!
//! For every node `n`, with ε the bump size and `w` its wing position:
//!
//! ```text
//! total       = (σ↑(t,K,F) − σ↓(t,K,F)) / 2ε          surfaces bumped at n
//! sensiStrike = (σ(K; k[w]+ε) − σ(K; k[w]−ε)) / 2ε    base smile, knot w moved
//! sensiVol    = (k↑[w] − k↓[w]) / 2ε                  knot w of the bumped smiles
//! result      = S · (total − sensiStrike · sensiVol)
//! ```
//!
//! Bumping a node vol also moves the strike its delta inverts to, so the raw
//! difference `total` contains a strike-mediated term. Subtracting
//! `sensiStrike · sensiVol` leaves the derivative with respect to the node
//! vol at a fixed strike grid.
//!
//! Every node is evaluated on freshly built surfaces, so with the `parallel`
//! feature the node loop runs on rayon without any synchronization.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::currency::{Currency, CurrencyPair};
use crate::error::{self, FxVolError};
use crate::provider::same_local_instant;
use crate::surface::{NodeMetadata, VolSurface};
use crate::validate::{require_positive, validate_positive};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default bump size, in volatility units.
pub const DEFAULT_SHIFT: f64 = 1e-7;

/// Sensitivity of a value to the implied volatility at one point.
///
/// Expiries compare equal only when both instant and offset agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensitivityPoint {
    /// Pair in which `strike` and `forward` are quoted.
    pub currency_pair: CurrencyPair,
    /// Option expiry.
    pub expiry: DateTime<FixedOffset>,
    /// Option strike.
    pub strike: f64,
    /// Forward rate to expiry.
    pub forward: f64,
    /// Currency of the sensitivity value.
    pub currency: Currency,
    /// `∂V/∂σ` at the point.
    pub sensitivity: f64,
}

impl PartialEq for SensitivityPoint {
    fn eq(&self, other: &Self) -> bool {
        self.currency_pair == other.currency_pair
            && same_local_instant(&self.expiry, &other.expiry)
            && self.strike == other.strike
            && self.forward == other.forward
            && self.currency == other.currency
            && self.sensitivity == other.sensitivity
    }
}

impl SensitivityPoint {
    /// Create a point sensitivity.
    pub fn new(
        currency_pair: CurrencyPair,
        expiry: DateTime<FixedOffset>,
        strike: f64,
        forward: f64,
        currency: Currency,
        sensitivity: f64,
    ) -> Self {
        Self {
            currency_pair,
            expiry,
            strike,
            forward,
            currency,
            sensitivity,
        }
    }

    /// The same point with the sensitivity scaled by `factor`.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        self.with_sensitivity(self.sensitivity * factor)
    }

    /// The same point with a different sensitivity value.
    #[must_use]
    pub fn with_sensitivity(&self, sensitivity: f64) -> Self {
        Self {
            sensitivity,
            ..*self
        }
    }
}

/// Sensitivity to every node of a surface, in node order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSensitivity {
    surface_name: String,
    currency: Currency,
    entries: Vec<(NodeMetadata, f64)>,
}

impl NodeSensitivity {
    /// Assemble a nodal sensitivity.
    pub fn new(
        surface_name: impl Into<String>,
        currency: Currency,
        entries: Vec<(NodeMetadata, f64)>,
    ) -> Self {
        Self {
            surface_name: surface_name.into(),
            currency,
            entries,
        }
    }

    /// Name of the surface the nodes belong to.
    pub fn surface_name(&self) -> &str {
        &self.surface_name
    }

    /// Currency of the values.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Node/value pairs, ascending pillar then wing position.
    pub fn iter(&self) -> impl Iterator<Item = &(NodeMetadata, f64)> {
        self.entries.iter()
    }

    /// Node metadata in order.
    pub fn metadata(&self) -> Vec<NodeMetadata> {
        self.entries.iter().map(|(m, _)| *m).collect()
    }

    /// Values in order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the surface had no nodes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all nodes.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Every value scaled by `factor`.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            surface_name: self.surface_name.clone(),
            currency: self.currency,
            entries: self.entries.iter().map(|(m, v)| (*m, v * factor)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NodeSensitivity {
    type Item = &'a (NodeMetadata, f64);
    type IntoIter = std::slice::Iter<'a, (NodeMetadata, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Bump-and-revalue projector of point sensitivities onto surface nodes.
///
/// # Examples
/// ```
/// use fxsmile::sensitivity::SensitivityProjector;
/// use fxsmile::surface::SmileSurface;
///
/// let surface = SmileSurface::from_quotes(
///     "smileEurUsd",
///     &[0.5, 1.0],
///     vec![0.25],
///     &[0.18, 0.17],
///     &[vec![-0.007], vec![-0.008]],
///     &[vec![0.012], vec![0.013]],
/// )?;
/// let nodes = SensitivityProjector::new().project(&surface, 0.75, 1.45, 1.39, 1.0)?;
/// assert_eq!(nodes.len(), 6);
/// # Ok::<(), fxsmile::FxVolError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityProjector {
    shift: f64,
}

impl Default for SensitivityProjector {
    fn default() -> Self {
        Self {
            shift: DEFAULT_SHIFT,
        }
    }
}

impl SensitivityProjector {
    /// Projector with the default bump of 1e-7.
    pub fn new() -> Self {
        Self::default()
    }

    /// Projector with a custom bump size.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if `shift` is not positive.
    pub fn with_shift(shift: f64) -> error::Result<Self> {
        validate_positive(shift, "shift")?;
        Ok(Self { shift })
    }

    /// Bump size in volatility units.
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Project `sensitivity = ∂V/∂σ(expiry, strike, forward)` onto every node
    /// of `surface`, in node order.
    ///
    /// # Errors
    /// Returns [`FxVolError::DomainError`] for a non-positive expiry, strike
    /// or forward, or when a bumped smile has no valid strike grid.
    pub fn project<S: VolSurface>(
        &self,
        surface: &S,
        expiry: f64,
        strike: f64,
        forward: f64,
        sensitivity: f64,
    ) -> error::Result<Vec<(NodeMetadata, f64)>> {
        require_positive(expiry, "expiry")?;
        require_positive(strike, "strike")?;
        require_positive(forward, "forward")?;
        let eps = self.shift;
        let base = surface.strike_smile(expiry, forward)?;
        let nodes = surface.node_metadata();

        #[cfg(feature = "logging")]
        tracing::debug!(
            surface = surface.name(),
            n_nodes = nodes.len(),
            expiry,
            strike,
            forward,
            shift = eps,
            "sensitivity projection started"
        );

        let node_value = |node: &NodeMetadata| -> error::Result<(NodeMetadata, f64)> {
            let up = surface.with_bumped_node(node, eps)?.strike_smile(expiry, forward)?;
            let dw = surface.with_bumped_node(node, -eps)?.strike_smile(expiry, forward)?;
            let total = (up.volatility(strike)?.0 - dw.volatility(strike)?.0) / (2.0 * eps);

            let w = node.position;
            let vol_strike_up = base.with_shifted_strike(w, eps)?.volatility(strike)?.0;
            let vol_strike_dw = base.with_shifted_strike(w, -eps)?.volatility(strike)?.0;
            let sensi_strike = (vol_strike_up - vol_strike_dw) / (2.0 * eps);
            let sensi_vol = (knot(up.strikes(), w)? - knot(dw.strikes(), w)?) / (2.0 * eps);

            Ok((*node, sensitivity * (total - sensi_strike * sensi_vol)))
        };

        #[cfg(feature = "parallel")]
        let values = nodes
            .par_iter()
            .map(node_value)
            .collect::<error::Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let values = nodes
            .iter()
            .map(node_value)
            .collect::<error::Result<Vec<_>>>()?;

        #[cfg(feature = "logging")]
        tracing::debug!(n_nodes = values.len(), "sensitivity projection complete");

        Ok(values)
    }
}

fn knot(strikes: &[f64], position: usize) -> error::Result<f64> {
    strikes.get(position).copied().ok_or_else(|| {
        FxVolError::invalid(format!(
            "node position {position} has no strike in a grid of {}",
            strikes.len()
        ))
    })
}
