// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Implied-quantity round-trips through the public API.

use merton::prelude::*;
use merton::utils::assert_approx_equal;
use time::macros::datetime;

const VALUATION: time::OffsetDateTime = datetime!(2024-01-02 0:00 UTC);

#[test]
fn implied_volatility_round_trips_the_pricing_scenarios() {
    // European scenarios, both payoff kinds, priced with the closed form
    // and inverted back.
    for (s, k, sigma, tau, r, q, flag) in [
        (100.0, 100.0, 0.20, 0.5, 0.01, 0.05, TypeFlag::Call),
        (100.0, 100.0, 0.20, 0.5, 0.02, 0.01, TypeFlag::Put),
        (100.0, 100.0, 0.20, 0.5, 0.01, 0.05, TypeFlag::Put),
        (40.0, 45.0, 0.20, 0.583, 0.0488, 0.0, TypeFlag::Put),
        (40.0, 45.0, 0.30, 1.0 / 3.0, 0.0488, 0.0, TypeFlag::Put),
    ] {
        let market = MarketParameters::new(s, sigma, VALUATION, r, q);
        let option = EuropeanOption::new(k, VALUATION + years(tau), flag);

        let price = AnalyticSolver::<Plain>::new(market)
            .solve(&option)
            .unwrap()
            .price();

        let implied = implied_volatility(&market, &option, price).unwrap();

        assert_approx_equal!(implied, sigma, 1e-9);
    }
}

#[test]
fn implied_volatility_is_carrier_independent() {
    let market = MarketParameters::new(100.0, 0.25, VALUATION, 0.01, 0.05);
    let option = EuropeanOption::new(105.0, VALUATION + years(0.5), TypeFlag::Call);

    let price = AnalyticSolver::<ReverseVar>::new(market)
        .solve(&option)
        .unwrap()
        .price();

    let implied = implied_volatility(&market, &option, price).unwrap();

    assert_approx_equal!(implied, 0.25, 1e-9);
}

#[test]
fn implied_dividend_round_trips_the_forward() {
    let market = MarketParameters::new(15_000.0, 0.21, VALUATION, 0.0, 0.002);
    let forward = EuropeanOption::new(15_000.0, VALUATION + years(0.5), TypeFlag::Forward);

    let observed = AnalyticSolver::<Plain>::new(market)
        .solve(&forward)
        .unwrap()
        .price();

    let implied = implied_dividend_yield(&market, &forward, observed).unwrap();

    assert_approx_equal!(implied, 0.002, 1e-9);
}
