//! Volatility provider: a smile surface bound to a currency pair and a clock.
//!
//! [`VolatilityProvider`] turns wall-clock expiries into year fractions with
//! its [`DayCount`], answers queries quoted in either direction of its
//! currency pair, and projects point sensitivities onto the surface nodes.
//!
//! # Pair inversion
//!
//! An option on USD/EUR struck at `1/K` with forward `1/F` is the same
//! contract as the EUR/USD option struck at `K` with forward `F`, so queries
//! in the inverse pair are served by reciprocating strike and forward.
//!
//! # Time measurement
//!
//! The year fraction is taken between the calendar dates of the valuation
//! instant and of the expiry, each read in its own UTC offset. An expiry
//! dated before the valuation date is a [`FxVolError::DomainError`].

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyPair;
use crate::daycount::DayCount;
use crate::error::{self, FxVolError};
use crate::sensitivity::{NodeSensitivity, SensitivityPoint, SensitivityProjector};
use crate::surface::{SmileSurface, VolSurface};
use crate::types::Vol;
use crate::validate::require_positive;

/// FX volatility provider over a smile surface.
///
/// Immutable; equality is by value. The surface is held behind an [`Arc`] so
/// providers built on the same surface share it. Valuation instants are equal
/// only when they agree on both the UTC instant and the offset, since the
/// offset fixes the calendar date time is measured from.
///
/// # Examples
/// ```
/// use chrono::DateTime;
/// use fxsmile::currency::{Currency, CurrencyPair};
/// use fxsmile::daycount::DayCount;
/// use fxsmile::provider::VolatilityProvider;
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
/// let pair = CurrencyPair::new(Currency::EUR, Currency::USD);
/// let valuation = DateTime::parse_from_rfc3339("2015-02-17T13:45:00Z").unwrap();
/// let provider = VolatilityProvider::new(surface, pair, DayCount::Act365F, valuation);
///
/// let expiry = DateTime::parse_from_rfc3339("2015-11-17T11:45:00Z").unwrap();
/// let direct = provider.volatility(&pair, &expiry, 1.45, 1.39)?;
/// let inverse = provider.volatility(&pair.inverse(), &expiry, 1.0 / 1.45, 1.0 / 1.39)?;
/// assert!((direct.0 - inverse.0).abs() < 1e-12);
/// # Ok::<(), fxsmile::FxVolError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityProvider<S = SmileSurface> {
    surface: Arc<S>,
    currency_pair: CurrencyPair,
    day_count: DayCount,
    valuation_date_time: DateTime<FixedOffset>,
}

impl<S: PartialEq> PartialEq for VolatilityProvider<S> {
    fn eq(&self, other: &Self) -> bool {
        self.surface == other.surface
            && self.currency_pair == other.currency_pair
            && self.day_count == other.day_count
            && same_local_instant(&self.valuation_date_time, &other.valuation_date_time)
    }
}

/// Same UTC instant read in the same offset.
pub(crate) fn same_local_instant(a: &DateTime<FixedOffset>, b: &DateTime<FixedOffset>) -> bool {
    a == b && a.offset() == b.offset()
}

impl<S: VolSurface> VolatilityProvider<S> {
    /// Create a provider owning `surface`.
    pub fn new(
        surface: S,
        currency_pair: CurrencyPair,
        day_count: DayCount,
        valuation_date_time: DateTime<FixedOffset>,
    ) -> Self {
        Self::from_shared(Arc::new(surface), currency_pair, day_count, valuation_date_time)
    }

    /// Create a provider over a surface shared with other holders.
    pub fn from_shared(
        surface: Arc<S>,
        currency_pair: CurrencyPair,
        day_count: DayCount,
        valuation_date_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            surface,
            currency_pair,
            day_count,
            valuation_date_time,
        }
    }

    /// Start a [`VolatilityProviderBuilder`].
    pub fn builder() -> VolatilityProviderBuilder<S> {
        VolatilityProviderBuilder::new()
    }

    /// The underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// A shared handle on the underlying surface.
    pub fn shared_surface(&self) -> Arc<S> {
        Arc::clone(&self.surface)
    }

    /// The pair the surface is quoted in.
    pub fn currency_pair(&self) -> CurrencyPair {
        self.currency_pair
    }

    /// Convention turning the valuation-to-expiry date span into years.
    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    /// Valuation instant, in the offset that fixes its calendar date.
    pub fn valuation_date_time(&self) -> DateTime<FixedOffset> {
        self.valuation_date_time
    }

    /// Year fraction from the valuation date to the expiry date.
    ///
    /// # Errors
    /// Returns [`FxVolError::DomainError`] if the expiry date precedes the
    /// valuation date.
    pub fn relative_time(&self, expiry: &DateTime<FixedOffset>) -> error::Result<f64> {
        let time = self.day_count.year_fraction(
            self.valuation_date_time.date_naive(),
            expiry.date_naive(),
        );
        if time < 0.0 {
            return Err(FxVolError::domain(format!(
                "expiry {expiry} precedes valuation {}",
                self.valuation_date_time
            )));
        }
        Ok(time)
    }

    /// Black volatility for an option on `pair` expiring at `expiry`.
    ///
    /// `pair` must be the provider's pair or its inverse; in the latter case
    /// `strike` and `forward` are quoted in the inverse pair.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] for any other pair and
    /// [`FxVolError::DomainError`] for a non-positive strike or forward, or
    /// an expiry not after the valuation date.
    pub fn volatility(
        &self,
        pair: &CurrencyPair,
        expiry: &DateTime<FixedOffset>,
        strike: f64,
        forward: f64,
    ) -> error::Result<Vol> {
        let (strike, forward) = self.restate(pair, strike, forward)?;
        let time = self.relative_time(expiry)?;
        self.surface.volatility(time, strike, forward)
    }

    /// Sensitivity of the point's value to every node of the surface, using
    /// the default [`SensitivityProjector`].
    ///
    /// # Errors
    /// As for [`volatility`](VolatilityProvider::volatility).
    pub fn surface_parameter_sensitivity(
        &self,
        point: &SensitivityPoint,
    ) -> error::Result<NodeSensitivity> {
        self.surface_parameter_sensitivity_with(point, &SensitivityProjector::default())
    }

    /// Sensitivity of the point's value to every node, with a custom projector.
    ///
    /// # Errors
    /// As for [`volatility`](VolatilityProvider::volatility).
    pub fn surface_parameter_sensitivity_with(
        &self,
        point: &SensitivityPoint,
        projector: &SensitivityProjector,
    ) -> error::Result<NodeSensitivity> {
        let (strike, forward) = self.restate(&point.currency_pair, point.strike, point.forward)?;
        let time = self.relative_time(&point.expiry)?;
        let entries = projector.project(
            self.surface.as_ref(),
            time,
            strike,
            forward,
            point.sensitivity,
        )?;
        Ok(NodeSensitivity::new(
            self.surface.name(),
            point.currency,
            entries,
        ))
    }

    /// Strike and forward restated in the provider's pair.
    fn restate(&self, pair: &CurrencyPair, strike: f64, forward: f64) -> error::Result<(f64, f64)> {
        require_positive(strike, "strike")?;
        require_positive(forward, "forward")?;
        if *pair == self.currency_pair {
            Ok((strike, forward))
        } else if pair.is_inverse_of(&self.currency_pair) {
            Ok((1.0 / strike, 1.0 / forward))
        } else {
            Err(FxVolError::invalid(format!(
                "currency pair {pair} is not supported by a {} provider",
                self.currency_pair
            )))
        }
    }
}

/// Builder for [`VolatilityProvider`].
#[derive(Debug)]
pub struct VolatilityProviderBuilder<S = SmileSurface> {
    surface: Option<Arc<S>>,
    currency_pair: Option<CurrencyPair>,
    day_count: Option<DayCount>,
    valuation_date_time: Option<DateTime<FixedOffset>>,
}

impl<S> Default for VolatilityProviderBuilder<S> {
    fn default() -> Self {
        Self {
            surface: None,
            currency_pair: None,
            day_count: None,
            valuation_date_time: None,
        }
    }
}

impl<S: VolSurface> VolatilityProviderBuilder<S> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the surface, taking ownership of it.
    pub fn surface(mut self, surface: S) -> Self {
        self.surface = Some(Arc::new(surface));
        self
    }

    /// Set a surface shared with other holders.
    pub fn shared_surface(mut self, surface: Arc<S>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Set the pair the surface is quoted in.
    pub fn currency_pair(mut self, pair: CurrencyPair) -> Self {
        self.currency_pair = Some(pair);
        self
    }

    /// Set the day-count convention.
    pub fn day_count(mut self, day_count: DayCount) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Set the valuation instant.
    pub fn valuation_date_time(mut self, valuation: DateTime<FixedOffset>) -> Self {
        self.valuation_date_time = Some(valuation);
        self
    }

    /// Build the provider.
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] if any field is missing.
    pub fn build(self) -> error::Result<VolatilityProvider<S>> {
        let surface = self
            .surface
            .ok_or_else(|| FxVolError::invalid("surface is required"))?;
        let currency_pair = self
            .currency_pair
            .ok_or_else(|| FxVolError::invalid("currency pair is required"))?;
        let day_count = self
            .day_count
            .ok_or_else(|| FxVolError::invalid("day count is required"))?;
        let valuation_date_time = self
            .valuation_date_time
            .ok_or_else(|| FxVolError::invalid("valuation date-time is required"))?;
        Ok(VolatilityProvider::from_shared(
            surface,
            currency_pair,
            day_count,
            valuation_date_time,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use approx::assert_abs_diff_eq;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn make_provider() -> VolatilityProvider {
        let surface = SmileSurface::from_quotes(
            "smileEurUsd",
            &[0.5, 1.0, 2.0],
            vec![0.10, 0.25],
            &[0.18, 0.17, 0.16],
            &[
                vec![-0.012, -0.007],
                vec![-0.013, -0.008],
                vec![-0.014, -0.009],
            ],
            &[
                vec![0.032, 0.012],
                vec![0.033, 0.013],
                vec![0.034, 0.014],
            ],
        )
        .unwrap();
        VolatilityProvider::new(
            surface,
            CurrencyPair::new(Currency::EUR, Currency::USD),
            DayCount::Act365F,
            ts("2015-02-17T13:45:00+00:00"),
        )
    }

    #[test]
    fn relative_time_uses_calendar_dates() {
        let p = make_provider();
        let t = p.relative_time(&ts("2015-02-18T00:00:00+00:00")).unwrap();
        assert_abs_diff_eq!(t, 1.0 / 365.0, epsilon = 1e-15);
        let t = p.relative_time(&ts("2016-06-17T11:45:00+01:00")).unwrap();
        assert_abs_diff_eq!(t, 486.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn same_day_expiry_is_zero_time() {
        let p = make_provider();
        assert_eq!(p.relative_time(&ts("2015-02-17T20:00:00+00:00")).unwrap(), 0.0);
        let result = p.volatility(
            &p.currency_pair(),
            &ts("2015-02-17T20:00:00+00:00"),
            1.4,
            1.39,
        );
        assert!(matches!(result, Err(FxVolError::DomainError { .. })));
    }

    #[test]
    fn rejects_expiry_before_valuation() {
        let p = make_provider();
        let result = p.relative_time(&ts("2015-02-16T13:45:00+00:00"));
        assert!(matches!(result, Err(FxVolError::DomainError { .. })));
    }

    #[test]
    fn volatility_delegates_to_surface() {
        let p = make_provider();
        let expiry = ts("2015-11-17T11:45:00+00:00");
        let t = p.relative_time(&expiry).unwrap();
        let expected = p.surface().volatility(t, 1.45, 1.39).unwrap();
        let computed = p.volatility(&p.currency_pair(), &expiry, 1.45, 1.39).unwrap();
        assert_eq!(computed, expected);
    }

    #[test]
    fn inverse_pair_reciprocates_strike_and_forward() {
        let p = make_provider();
        let expiry = ts("2015-11-17T11:45:00+00:00");
        let pair = p.currency_pair();
        for k in [1.1, 1.3, 1.45, 1.7] {
            let direct = p.volatility(&pair, &expiry, k, 1.39).unwrap();
            let inverse = p
                .volatility(&pair.inverse(), &expiry, 1.0 / k, 1.0 / 1.39)
                .unwrap();
            assert_abs_diff_eq!(direct.0, inverse.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_unrelated_pair() {
        let p = make_provider();
        let gbpusd = CurrencyPair::new(Currency::GBP, Currency::USD);
        let result = p.volatility(&gbpusd, &ts("2015-11-17T11:45:00+00:00"), 1.45, 1.39);
        assert!(matches!(result, Err(FxVolError::InvalidInput { .. })));
    }

    #[test]
    fn rejects_non_positive_strike() {
        let p = make_provider();
        let result = p.volatility(
            &p.currency_pair().inverse(),
            &ts("2015-11-17T11:45:00+00:00"),
            0.0,
            1.39,
        );
        assert!(matches!(result, Err(FxVolError::DomainError { .. })));
    }

    #[test]
    fn builder_matches_constructor() {
        let p = make_provider();
        let built = VolatilityProvider::builder()
            .shared_surface(p.shared_surface())
            .currency_pair(p.currency_pair())
            .day_count(p.day_count())
            .valuation_date_time(p.valuation_date_time())
            .build()
            .unwrap();
        assert_eq!(built, p);
    }

    #[test]
    fn builder_requires_every_field() {
        let p = make_provider();
        let result = VolatilityProvider::<SmileSurface>::builder()
            .shared_surface(p.shared_surface())
            .currency_pair(p.currency_pair())
            .day_count(DayCount::Act360)
            .build();
        assert!(matches!(result, Err(FxVolError::InvalidInput { .. })));
    }

    #[test]
    fn differs_by_any_field() {
        let p = make_provider();
        let other = VolatilityProvider::from_shared(
            p.shared_surface(),
            p.currency_pair().inverse(),
            DayCount::Act360,
            ts("2015-12-21T11:15:00Z"),
        );
        assert_ne!(p, other);
    }

    #[test]
    fn equality_distinguishes_offsets_of_the_same_instant() {
        let p = make_provider();
        let at = |valuation: &str| {
            VolatilityProvider::from_shared(
                p.shared_surface(),
                p.currency_pair(),
                DayCount::Act365F,
                ts(valuation),
            )
        };
        let london = at("2015-02-17T23:30:00+00:00");
        let paris = at("2015-02-18T00:30:00+01:00");
        assert_eq!(london.valuation_date_time(), paris.valuation_date_time());
        assert_ne!(london, paris);
        assert_eq!(london, at("2015-02-17T23:30:00Z"));

        let expiry = ts("2015-08-17T10:00:00+00:00");
        assert_abs_diff_eq!(
            london.relative_time(&expiry).unwrap(),
            181.0 / 365.0,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            paris.relative_time(&expiry).unwrap(),
            180.0 / 365.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn sensitivity_carries_surface_name_and_currency() {
        let p = make_provider();
        let point = SensitivityPoint::new(
            p.currency_pair(),
            ts("2015-11-17T11:45:00+00:00"),
            1.45,
            1.39,
            Currency::GBP,
            1.0,
        );
        let sensi = p.surface_parameter_sensitivity(&point).unwrap();
        assert_eq!(sensi.surface_name(), "smileEurUsd");
        assert_eq!(sensi.currency(), Currency::GBP);
        assert_eq!(sensi.len(), 15);
    }

    #[test]
    fn serde_round_trip() {
        let p = make_provider();
        let json = serde_json::to_string(&p).unwrap();
        let back: VolatilityProvider = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
