// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Binomial lattice pricing scenarios (2000-step regression suite).

use merton::prelude::*;
use merton::utils::assert_approx_equal;
use time::macros::datetime;

const VALUATION: time::OffsetDateTime = datetime!(2024-01-02 0:00 UTC);

#[test]
fn european_call_pricing_using_binomial_tree() {
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.01, 0.05);
    let call = EuropeanOption::new(100.0, VALUATION + years(0.5), TypeFlag::Call);

    let crr = CrrSolver::new(market, 2000, 0).unwrap().solve(&call).unwrap();
    let var = AnalyticSolver::<ReverseVar>::new(market).solve(&call).unwrap();

    assert_approx_equal!(crr.price(), 4.62377, 5e-3);
    assert_approx_equal!(crr.delta(), 0.460165, 5e-5);
    assert_approx_equal!(crr.gamma(), var.gamma(), 3e-5);
    assert_approx_equal!(crr.theta(), var.theta(), 5e-3);
    assert_approx_equal!(crr.vega(), var.vega(), var.vega().abs() * 5e-3);
    assert_approx_equal!(crr.rho(), var.rho(), var.rho().abs() * 5e-3);
    assert_approx_equal!(crr.psi(), var.psi(), var.psi().abs() * 5e-3);
}

#[test]
fn european_put_pricing_using_binomial_tree() {
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.01, 0.05);
    let put = EuropeanOption::new(100.0, VALUATION + years(0.5), TypeFlag::Put);

    let crr = CrrSolver::new(market, 2000, 0).unwrap().solve(&put).unwrap();
    let var = AnalyticSolver::<ReverseVar>::new(market).solve(&put).unwrap();

    assert_approx_equal!(crr.price(), var.price(), 5e-3);
    assert_approx_equal!(crr.delta(), var.delta(), 5e-5);
    assert_approx_equal!(crr.gamma(), var.gamma(), 3e-5);
    assert_approx_equal!(crr.theta(), var.theta(), 5e-3);
    assert_approx_equal!(crr.vega(), var.vega(), var.vega().abs() * 5e-3);
    assert_approx_equal!(crr.rho(), var.rho(), var.rho().abs() * 5e-3);
    assert_approx_equal!(crr.psi(), var.psi(), var.psi().abs() * 5e-3);
}

#[test]
fn american_call_without_dividends_prices_as_european() {
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.01, 0.0);
    let expiry = VALUATION + years(0.5);

    let crr = CrrSolver::new(market, 2000, 0)
        .unwrap()
        .solve_american(&AmericanOption::new(100.0, expiry, TypeFlag::Call))
        .unwrap();
    let var = AnalyticSolver::<ReverseVar>::new(market)
        .solve(&EuropeanOption::new(100.0, expiry, TypeFlag::Call))
        .unwrap();

    assert_approx_equal!(crr.price(), 5.8753208697, 5e-3);
    assert_approx_equal!(crr.delta(), 0.5422297484, 5e-5);
    assert_approx_equal!(crr.gamma(), 0.0280617422, 3e-5);

    // Early exercise never pays without dividends: the American call is
    // the European call.
    assert_approx_equal!(crr.price(), var.price(), 5e-3);
    assert_approx_equal!(crr.delta(), var.delta(), 5e-5);
    assert_approx_equal!(crr.gamma(), var.gamma(), 3e-5);
    assert_approx_equal!(crr.theta(), var.theta(), 5e-3);
    assert_approx_equal!(crr.vega(), var.vega(), var.vega().abs() * 5e-3);
    assert_approx_equal!(crr.rho(), var.rho(), var.rho().abs() * 5e-3);

    assert!(crr.exercise_boundary(0.25).is_infinite());
}

#[test]
fn american_put_pricing_using_binomial_tree() {
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.01, 0.05);
    let put = AmericanOption::new(100.0, VALUATION + years(0.5), TypeFlag::Put);

    let crr = CrrSolver::new(market, 2000, 0)
        .unwrap()
        .solve_american(&put)
        .unwrap();

    assert_approx_equal!(crr.price(), 6.5933242703, 5e-3);
    assert_approx_equal!(crr.delta(), -0.5151482623, 5e-5);
    assert_approx_equal!(crr.gamma(), 0.0274551564, 3e-5);
    assert_approx_equal!(crr.theta(), -7.4856732784, 5e-3);
    assert_approx_equal!(crr.vega(), 27.4428949973, 27.4428949973 * 5e-3);
    assert_approx_equal!(crr.rho(), -29.049575029, 29.049575029 * 5e-3);
    assert_approx_equal!(crr.psi(), 25.7710879181, 25.7710879181 * 5e-3);
}

#[test]
fn american_put_pricing_using_extra_steps() {
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.01, 0.05);
    let put = AmericanOption::new(100.0, VALUATION + years(0.5), TypeFlag::Put);

    let crr = CrrSolver::new(market, 2000, 200)
        .unwrap()
        .solve_american(&put)
        .unwrap();

    // The shifted root reports the same price and greeks.
    assert_approx_equal!(crr.price(), 6.5933242703, 5e-3);
    assert_approx_equal!(crr.delta(), -0.5151482623, 5e-5);
    assert_approx_equal!(crr.gamma(), 0.0274551564, 3e-5);
    assert_approx_equal!(crr.theta(), -7.4856732784, 5e-3);
    assert_approx_equal!(crr.vega(), 27.4428949973, 27.4428949973 * 5e-3);
    assert_approx_equal!(crr.rho(), -29.049575029, 29.049575029 * 5e-3);
    assert_approx_equal!(crr.psi(), 25.7710879181, 25.7710879181 * 5e-3);

    // The reconstructed boundary exists on the whole life of the option.
    let boundary = crr.exercise_boundary(0.5);
    assert!(boundary > 0.0);
    assert!(boundary < 100.0);
}

#[test]
fn american_put_boundary_shape() {
    // r >= q, so the boundary reaches the strike at maturity.
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.02, 0.01);
    let put = AmericanOption::new(100.0, VALUATION + years(0.5), TypeFlag::Put);

    let crr = CrrSolver::new(market, 2000, 200)
        .unwrap()
        .solve_american(&put)
        .unwrap();

    assert_approx_equal!(crr.exercise_boundary(0.0), 100.0, 1e-12);

    // Bounded above by the strike, and far from maturity the critical
    // spot sits visibly lower than near maturity.
    let near = crr.exercise_boundary(0.05);
    let far = crr.exercise_boundary(0.45);

    assert!(near <= 100.0);
    assert!(far <= 100.0);
    assert!(far <= near + 1e-2);

    // Outside [0, tau] the boundary is undefined.
    assert!(crr.exercise_boundary(0.51).is_nan());
    assert!(crr.exercise_boundary(-0.01).is_nan());
}
