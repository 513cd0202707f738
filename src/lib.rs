//! # fxsmile
//!
//! Delta-quoted FX volatility smile surfaces for option pricing and risk.
//!
//! Takes market quotes (ATM, risk reversals, strangles at fixed deltas per
//! expiry) → per-expiry smiles in strike space → Black volatility at any
//! (expiry, strike, forward) → projection of point sensitivities back onto
//! the quoted nodes.
//!
//! ## Architecture
//!
//! - **`smile`** — Single-expiry delta smiles ([`SmileSlice`]) and their strike-space view
//! - **`surface`** — Multi-expiry [`SmileSurface`] with time interpolation and node bumping
//! - **`provider`** — [`VolatilityProvider`]: surface + currency pair + day count + valuation instant
//! - **`sensitivity`** — [`SensitivityProjector`]: bump-and-revalue nodal sensitivities
//! - **`conventions`**, **`interp`**, **`daycount`**, **`currency`** — market conventions and numerics
//!
//! ## Design
//!
//! - **Newtypes for outputs, bare `f64` for inputs.** [`Vol`] and [`Variance`]
//!   wrap return values. Inputs take raw `f64`; validation happens inside
//!   constructors and builders.
//! - **No panics.** Every fallible operation returns [`Result`]. Library code
//!   never calls `unwrap()` or `expect()`.
//! - **Immutable values.** Slices, surfaces and providers cannot be modified.
//!   Bumps and shifts return new values.
//! - **Thread-safe.** [`VolSurface`] requires `Send + Sync`. A provider holds
//!   its surface in an `Arc` and can be queried from any number of threads.
//! - **Serializable.** All value types implement Serde `Serialize` /
//!   `Deserialize`, validating on deserialization where invariants exist.
//!
//! ## Features
//!
//! - `logging` — `tracing` events on surface construction and projection.
//! - `parallel` — node loop of the [`SensitivityProjector`] runs on rayon.

pub mod conventions;
pub mod currency;
pub mod daycount;
pub mod error;
pub mod interp;
pub mod provider;
pub mod sensitivity;
pub mod smile;
pub mod surface;
pub mod types;
mod validate;

#[doc(inline)]
pub use currency::{Currency, CurrencyPair};
#[doc(inline)]
pub use daycount::DayCount;
#[doc(inline)]
pub use error::{FxVolError, Result};
#[doc(inline)]
pub use interp::Interpolator1D;
#[doc(inline)]
pub use provider::VolatilityProvider;
#[doc(inline)]
pub use sensitivity::{NodeSensitivity, SensitivityPoint, SensitivityProjector};
#[doc(inline)]
pub use smile::SmileSlice;
#[doc(inline)]
pub use surface::{SmileSurface, TimeInterpolation, VolSurface};
#[doc(inline)]
pub use types::{OptionType, Variance, Vol};
