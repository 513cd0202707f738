//! Core domain types for FX smile queries.
//!
//! Outputs use newtypes ([`Vol`], [`Variance`]) so callers cannot silently
//! mix a volatility with a total variance. Inputs stay bare
//! `f64`, validated inside constructors and query methods.
//!
//! # Why no `Eq` or `Ord`?
//! These types wrap `f64`, which does not implement `Eq` or `Ord` because `NaN`
//! breaks total ordering. We derive `PartialEq` and `PartialOrd` only.

use serde::{Deserialize, Serialize};

/// Implied Black volatility `σ`, annualized.
///
/// # Examples
/// ```
/// use fxsmile::types::Vol;
/// let vol = Vol(0.175);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Vol(pub f64);

/// Total Black variance `σ²t`.
///
/// Cross-pillar interpolation of the smile is performed on total variance,
/// which is linear in time for a flat forward volatility.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Variance(pub f64);

/// Option type: call or put.
///
/// Selects the branch of the Black delta formula when a wing delta is
/// converted to a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy the base currency at the strike.
    Call,
    /// Right to sell the base currency at the strike.
    Put,
}

impl Vol {
    /// Total variance `σ²t` for this volatility over `time` years.
    pub fn total_variance(self, time: f64) -> Variance {
        Variance(self.0 * self.0 * time)
    }
}

impl Variance {
    /// Volatility implied by this total variance over `time` years.
    pub fn to_vol(self, time: f64) -> Vol {
        Vol((self.0 / time).sqrt())
    }
}
