//! Single-expiry FX smiles.
//!
//! - [`SmileSlice`] — delta-quoted smile (ATM plus put/call wings per delta)
//! - [`StrikeSmile`] — the same smile restated on a strike grid at a fixed
//!   forward, which is how volatilities are actually read

pub mod slice;
pub mod strike;

pub use slice::{ATM_DELTA_LABEL, SmileSlice};
pub use strike::StrikeSmile;
