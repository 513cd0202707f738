//! Property-based tests using proptest.
//!
//! These tests verify invariant properties across random inputs rather than
//! testing fixed examples.

use chrono::{DateTime, Duration, FixedOffset};
use fxsmile::conventions;
use fxsmile::{
    Currency, CurrencyPair, DayCount, OptionType, SmileSlice, SmileSurface, VolSurface,
    VolatilityProvider,
};
use proptest::prelude::*;

fn surface(atm_short: f64, atm_long: f64, rr: f64, strangle: f64) -> SmileSurface {
    SmileSurface::from_quotes(
        "prop",
        &[0.25, 1.0, 3.0],
        vec![0.10, 0.25],
        &[atm_short, 0.5 * (atm_short + atm_long), atm_long],
        &[
            vec![2.0 * rr, rr],
            vec![2.0 * rr, rr],
            vec![2.0 * rr, rr],
        ],
        &[
            vec![3.0 * strangle, strangle],
            vec![3.0 * strangle, strangle],
            vec![3.0 * strangle, strangle],
        ],
    )
    .unwrap()
}

// --- Property Test 1: delta/strike round trip ---

proptest! {
    /// Inverting a delta to a strike and measuring the delta at that strike
    /// returns the original delta, for both wings.
    #[test]
    fn strike_from_delta_inverts_black_delta(
        delta in 0.05_f64..0.45,
        forward in 0.5_f64..2.0,
        time in 0.02_f64..5.0,
        vol in 0.05_f64..0.6,
    ) {
        let call = conventions::strike_from_delta(delta, OptionType::Call, forward, time, vol).unwrap();
        let put = conventions::strike_from_delta(delta, OptionType::Put, forward, time, vol).unwrap();
        let call_delta = conventions::black_delta(forward, call, time, vol, OptionType::Call).unwrap();
        let put_delta = conventions::black_delta(forward, put, time, vol, OptionType::Put).unwrap();
        prop_assert!((call_delta - delta).abs() < 1e-10);
        prop_assert!((put_delta + delta).abs() < 1e-10);
        prop_assert!(put < call);
    }
}

// --- Property Test 2: derived strikes increase across the smile ---

proptest! {
    /// For moderate skews the derived strike grid is strictly increasing
    /// from the deep put to the deep call.
    #[test]
    fn slice_strikes_are_increasing(
        atm in 0.08_f64..0.4,
        rr in -0.02_f64..0.02,
        strangle in 0.0_f64..0.01,
        forward in 0.5_f64..2.0,
        time in 0.05_f64..3.0,
    ) {
        let slice = SmileSlice::from_quotes(
            time,
            vec![0.10, 0.25],
            atm,
            &[2.0 * rr, rr],
            &[3.0 * strangle, strangle],
        ).unwrap();
        let strikes = slice.strikes(forward).unwrap();
        prop_assert!(strikes.windows(2).all(|w| w[0] < w[1]), "{strikes:?}");
    }
}

// --- Property Test 3: pillar exactness ---

proptest! {
    /// At a pillar expiry the surface reproduces that pillar's smile exactly.
    #[test]
    fn pillar_query_is_exact(
        atm_short in 0.1_f64..0.3,
        atm_long in 0.1_f64..0.3,
        rr in -0.01_f64..0.01,
        strangle in 0.0_f64..0.01,
        strike in 0.6_f64..1.8,
        pillar in 0_usize..3,
    ) {
        let s = surface(atm_short, atm_long, rr, strangle);
        let slice = &s.slices()[pillar];
        let from_surface = s.volatility(slice.time(), strike, 1.2).unwrap();
        let from_slice = slice.volatility_at(strike, 1.2).unwrap();
        prop_assert_eq!(from_surface, from_slice);
    }
}

// --- Property Test 4: vol stays within the node range ---

proptest! {
    /// Linear-flat interpolation never leaves the range spanned by the
    /// synthesized slice's node vols.
    #[test]
    fn vol_bounded_by_slice_nodes(
        atm_short in 0.1_f64..0.3,
        atm_long in 0.1_f64..0.3,
        rr in -0.01_f64..0.01,
        strangle in 0.0_f64..0.01,
        expiry in 0.05_f64..4.0,
        strike in 0.3_f64..3.0,
    ) {
        let s = surface(atm_short, atm_long, rr, strangle);
        let vols = s.slice_at_time(expiry).unwrap().vols().to_vec();
        let lo = vols.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = vols.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let v = s.volatility(expiry, strike, 1.2).unwrap().0;
        prop_assert!(v >= lo - 1e-14 && v <= hi + 1e-14, "{v} outside [{lo}, {hi}]");
    }
}

// --- Property Test 5: pair symmetry ---

proptest! {
    /// Quoting in the inverse pair with reciprocal strike and forward gives
    /// the same volatility.
    #[test]
    fn inverse_pair_symmetry(
        strike in 0.6_f64..2.0,
        forward in 0.9_f64..1.6,
        days in 1_i64..2000,
    ) {
        let valuation: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2015-02-17T13:45:00+00:00").unwrap();
        let pair = CurrencyPair::new(Currency::EUR, Currency::USD);
        let p = VolatilityProvider::new(
            surface(0.18, 0.16, -0.008, 0.012),
            pair,
            DayCount::Act365F,
            valuation,
        );
        let expiry = valuation + Duration::days(days);
        let direct = p.volatility(&pair, &expiry, strike, forward).unwrap().0;
        let inverse = p
            .volatility(&pair.inverse(), &expiry, 1.0 / strike, 1.0 / forward)
            .unwrap()
            .0;
        prop_assert!((direct - inverse).abs() < 1e-12);
    }
}

// --- Property Test 6: serde round trip preserves queries ---

proptest! {
    #[test]
    fn serde_round_trip_preserves_surface(
        atm_short in 0.1_f64..0.3,
        atm_long in 0.1_f64..0.3,
        rr in -0.01_f64..0.01,
        strangle in 0.0_f64..0.01,
    ) {
        let s = surface(atm_short, atm_long, rr, strangle);
        let json = serde_json::to_string(&s).unwrap();
        let back: SmileSurface = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, s);
    }
}
