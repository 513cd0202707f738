//! Error types for the fxsmile library.
//!
//! Structural problems (unsorted pillars, mismatched grids, an unsupported
//! currency pair) are reported as [`FxVolError::InvalidInput`]. Numerical
//! domain violations at query time (non-positive strike or forward, a delta
//! that inverts to a non-positive strike, an expiry before the valuation
//! instant) are reported as [`FxVolError::DomainError`].

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, FxVolError>;

/// Errors that can occur during smile construction, volatility queries and
/// sensitivity projection.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FxVolError {
    /// Input data is structurally invalid (e.g., non-increasing pillar times,
    /// mismatched vol/delta lengths, unsupported currency pair).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A value lies outside the domain of the computation (e.g., non-positive
    /// forward, derived strike ≤ 0, expiry before valuation).
    #[error("domain error: {message}")]
    DomainError { message: String },
}

impl FxVolError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        FxVolError::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        FxVolError::DomainError {
            message: message.into(),
        }
    }
}
