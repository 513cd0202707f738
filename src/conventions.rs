//! Market conventions for delta-quoted FX smiles.
//!
//! FX option volatilities are quoted against Black forward deltas rather than
//! strikes. This module holds the conversions between the two: the
//! undiscounted Black delta of a call or put, its inverse (delta → strike),
//! and the delta-neutral straddle strike used for the at-the-money pillar.
//!
//! # Formulas
//!
//! With `d₁ = (ln(F/K) + σ²t/2) / (σ√t)`:
//!
//! ```text
//! call delta  Δc = N(d₁)           K = F · exp(−N⁻¹(Δc)·σ√t + σ²t/2)
//! put delta   Δp = N(d₁) − 1       K = F · exp( N⁻¹(|Δp|)·σ√t + σ²t/2)
//! ATM (DNS)   Δc + Δp = 0          K = F · exp(σ²t/2)
//! ```

use statrs::function::erf::{erfc, erfc_inv};

use crate::error::{self, FxVolError};
use crate::types::OptionType;
use crate::validate::require_positive;

/// Standard normal cumulative distribution function `N(x)`.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Standard normal density `φ(x)`.
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Inverse of the standard normal CDF, `N⁻¹(p)` for `p ∈ (0, 1)`.
///
/// The `erfc⁻¹` seed is polished with one Newton step on `N(x) = p`, which
/// brings it to full double precision.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    let x = -std::f64::consts::SQRT_2 * erfc_inv(2.0 * p);
    let density = normal_pdf(x);
    if !x.is_finite() || density <= 0.0 {
        return x;
    }
    x - (normal_cdf(x) - p) / density
}

/// Convert a strike to log-moneyness: k = ln(K / F).
pub fn log_moneyness(strike: f64, forward: f64) -> f64 {
    (strike / forward).ln()
}

/// Undiscounted Black forward delta of a vanilla option.
///
/// Calls return a value in (0, 1); puts return a value in (−1, 0).
///
/// # Errors
/// Returns [`FxVolError::DomainError`] if any input is non-positive.
pub fn black_delta(
    forward: f64,
    strike: f64,
    time: f64,
    vol: f64,
    option_type: OptionType,
) -> error::Result<f64> {
    require_positive(forward, "forward")?;
    require_positive(strike, "strike")?;
    require_positive(time, "time")?;
    require_positive(vol, "vol")?;
    let sigma_root_t = vol * time.sqrt();
    let d1 = -log_moneyness(strike, forward) / sigma_root_t + 0.5 * sigma_root_t;
    Ok(match option_type {
        OptionType::Call => normal_cdf(d1),
        OptionType::Put => normal_cdf(d1) - 1.0,
    })
}

/// Strike at which a call or put has the given absolute forward delta.
///
/// `delta` is the absolute delta in (0, 1): a 10-delta put is requested as
/// `strike_from_delta(0.10, OptionType::Put, ...)`.
///
/// # Errors
/// Returns [`FxVolError::DomainError`] if the delta lies outside (0, 1), any
/// other input is non-positive, or the inversion does not produce a positive
/// finite strike.
///
/// # Examples
/// ```
/// use fxsmile::conventions::{black_delta, strike_from_delta};
/// use fxsmile::types::OptionType;
///
/// let k = strike_from_delta(0.25, OptionType::Call, 1.39, 1.0, 0.17)?;
/// let delta = black_delta(1.39, k, 1.0, 0.17, OptionType::Call)?;
/// assert!((delta - 0.25).abs() < 1e-12);
/// # Ok::<(), fxsmile::FxVolError>(())
/// ```
pub fn strike_from_delta(
    delta: f64,
    option_type: OptionType,
    forward: f64,
    time: f64,
    vol: f64,
) -> error::Result<f64> {
    if !delta.is_finite() || delta <= 0.0 || delta >= 1.0 {
        return Err(FxVolError::domain(format!(
            "delta must lie in (0, 1), got {delta}"
        )));
    }
    require_positive(forward, "forward")?;
    require_positive(time, "time")?;
    require_positive(vol, "vol")?;
    let sigma_root_t = vol * time.sqrt();
    let d1 = match option_type {
        OptionType::Call => inverse_normal_cdf(delta),
        OptionType::Put => -inverse_normal_cdf(delta),
    };
    let strike = forward * (-d1 * sigma_root_t + 0.5 * sigma_root_t * sigma_root_t).exp();
    checked_strike(strike, delta, vol, time)
}

/// Delta-neutral straddle strike `F · exp(σ²t/2)`.
///
/// # Errors
/// Returns [`FxVolError::DomainError`] if any input is non-positive or the
/// result is not a positive finite strike.
pub fn atm_strike(forward: f64, time: f64, vol: f64) -> error::Result<f64> {
    require_positive(forward, "forward")?;
    require_positive(time, "time")?;
    require_positive(vol, "vol")?;
    let strike = forward * (0.5 * vol * vol * time).exp();
    checked_strike(strike, 0.5, vol, time)
}

fn checked_strike(strike: f64, delta: f64, vol: f64, time: f64) -> error::Result<f64> {
    if !strike.is_finite() || strike <= 0.0 {
        return Err(FxVolError::domain(format!(
            "delta {delta} with vol {vol} and time {time} inverts to invalid strike {strike}"
        )));
    }
    Ok(strike)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn inverse_normal_matches_known_quantiles() {
        assert_abs_diff_eq!(inverse_normal_cdf(0.5), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(inverse_normal_cdf(0.975), 1.959_963_984_540_054, epsilon = 1e-12);
        assert_abs_diff_eq!(inverse_normal_cdf(0.10), -1.281_551_565_544_601, epsilon = 1e-12);
    }

    #[test]
    fn normal_cdf_inverts_quantile() {
        for p in [0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
            assert_abs_diff_eq!(normal_cdf(inverse_normal_cdf(p)), p, epsilon = 1e-14);
        }
    }

    #[test]
    fn inverse_normal_is_full_precision() {
        for p in [1e-6, 1e-3, 0.01, 0.1, 0.25, 0.999] {
            assert_abs_diff_eq!(normal_cdf(inverse_normal_cdf(p)), p, epsilon = 1e-15);
        }
        assert_abs_diff_eq!(inverse_normal_cdf(0.01), -2.326_347_874_040_841, epsilon = 1e-14);
    }

    #[test]
    fn deep_wing_strikes_reproduce_delta() {
        for delta in [0.01, 0.05, 0.10] {
            for option_type in [OptionType::Call, OptionType::Put] {
                let k = strike_from_delta(delta, option_type, 1.39, 0.25, 0.175).unwrap();
                let d = black_delta(1.39, k, 0.25, 0.175, option_type).unwrap();
                assert_abs_diff_eq!(d.abs(), delta, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn normal_pdf_at_zero() {
        assert_abs_diff_eq!(normal_pdf(0.0), 0.398_942_280_401_432_7, epsilon = 1e-16);
    }

    #[test]
    fn call_strike_reproduces_delta() {
        for delta in [0.10, 0.25, 0.40] {
            let k = strike_from_delta(delta, OptionType::Call, 1.39, 1.33, 0.16).unwrap();
            assert!(k > 1.39, "OTM call strike should sit above the forward");
            let d = black_delta(1.39, k, 1.33, 0.16, OptionType::Call).unwrap();
            assert_abs_diff_eq!(d, delta, epsilon = 1e-12);
        }
    }

    #[test]
    fn put_strike_reproduces_delta() {
        for delta in [0.10, 0.25, 0.40] {
            let k = strike_from_delta(delta, OptionType::Put, 1.39, 1.33, 0.18).unwrap();
            let d = black_delta(1.39, k, 1.33, 0.18, OptionType::Put).unwrap();
            assert_abs_diff_eq!(d, -delta, epsilon = 1e-12);
        }
    }

    #[test]
    fn atm_strike_is_delta_neutral() {
        let k = atm_strike(1.39, 2.0, 0.16).unwrap();
        let call = black_delta(1.39, k, 2.0, 0.16, OptionType::Call).unwrap();
        let put = black_delta(1.39, k, 2.0, 0.16, OptionType::Put).unwrap();
        assert_abs_diff_eq!(call + put, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn rejects_out_of_range_delta() {
        for delta in [0.0, 1.0, -0.1, f64::NAN] {
            let result = strike_from_delta(delta, OptionType::Call, 1.39, 1.0, 0.16);
            assert!(matches!(result, Err(FxVolError::DomainError { .. })));
        }
    }

    #[test]
    fn rejects_non_positive_forward() {
        let result = strike_from_delta(0.25, OptionType::Put, 0.0, 1.0, 0.16);
        assert!(matches!(result, Err(FxVolError::DomainError { .. })));
        assert!(matches!(
            atm_strike(-1.39, 1.0, 0.16),
            Err(FxVolError::DomainError { .. })
        ));
    }

    #[test]
    fn log_moneyness_at_forward_is_zero() {
        assert_abs_diff_eq!(log_moneyness(1.39, 1.39), 0.0, epsilon = 1e-15);
    }
}
