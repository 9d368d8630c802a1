// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! QD+ pricing scenarios: the lattice cross-check and Li (2009) table 7.

use merton::prelude::*;
use merton::utils::assert_approx_equal;
use time::macros::datetime;

const VALUATION: time::OffsetDateTime = datetime!(2024-01-02 0:00 UTC);

#[test]
fn american_put_matches_the_binomial_tree() {
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.01, 0.05);
    let put = AmericanOption::new(100.0, VALUATION + years(0.5), TypeFlag::Put);

    let qdplus = QdPlusSolver::new(market).solve_american(&put).unwrap();

    // The reference value comes from the 2000-step CRR solve.
    assert_approx_equal!(qdplus.price(), 6.5933242703, 5e-3);
}

#[test]
fn american_put_matches_li_2009_table_7() {
    let market = MarketParameters::new(40.0, 0.20, VALUATION, 0.0488, 0.0);
    let put = AmericanOption::new(45.0, VALUATION + years(0.583), TypeFlag::Put);

    let qdplus = QdPlusSolver::new(market).solve_american(&put).unwrap();

    assert_approx_equal!(qdplus.price(), 5.253, 5e-4);
    assert_approx_equal!(qdplus.exercise_boundary(0.583), 37.49, 5e-3);
}

#[test]
fn american_put_matches_li_2009_table_7_higher_vol() {
    let market = MarketParameters::new(40.0, 0.30, VALUATION, 0.0488, 0.0);
    let put = AmericanOption::new(45.0, VALUATION + years(1.0 / 3.0), TypeFlag::Put);

    let qdplus = QdPlusSolver::new(market).solve_american(&put).unwrap();

    assert_approx_equal!(qdplus.price(), 5.687, 5e-4);
    assert_approx_equal!(qdplus.exercise_boundary(1.0 / 3.0), 34.68, 5e-3);
}

#[test]
fn greeks_are_finite_and_put_shaped() {
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.01, 0.05);
    let put = AmericanOption::new(100.0, VALUATION + years(0.5), TypeFlag::Put);

    let qdplus = QdPlusSolver::new(market).solve_american(&put).unwrap();

    assert!(qdplus.delta() < 0.0);
    assert!(qdplus.delta() > -1.0);
    assert!(qdplus.gamma() > 0.0);
    assert!(qdplus.vega() > 0.0);
    assert!(qdplus.theta() < 0.0);
    assert!(qdplus.rho() < 0.0);
    assert!(qdplus.psi() > 0.0);
}

#[test]
fn boundary_is_monotone_in_time_to_maturity() {
    let market = MarketParameters::new(40.0, 0.20, VALUATION, 0.0488, 0.0);
    let put = AmericanOption::new(45.0, VALUATION + years(0.583), TypeFlag::Put);

    let qdplus = QdPlusSolver::new(market).solve_american(&put).unwrap();

    let mut previous = 0.0;
    for tau_prime in [0.583, 0.45, 0.3, 0.15, 0.05, 0.0] {
        let boundary = qdplus.exercise_boundary(tau_prime);
        assert!(boundary >= previous);
        assert!(boundary <= 45.0);
        previous = boundary;
    }

    // r >= q: the boundary at maturity is the strike.
    assert_approx_equal!(qdplus.exercise_boundary(0.0), 45.0, 1e-12);
}

#[test]
fn american_call_without_dividends_is_european() {
    let market = MarketParameters::new(100.0, 0.20, VALUATION, 0.01, 0.0);
    let expiry = VALUATION + years(0.5);

    let qdplus = QdPlusSolver::new(market)
        .solve_american(&AmericanOption::new(100.0, expiry, TypeFlag::Call))
        .unwrap();
    let european = AnalyticSolver::<Plain>::new(market)
        .solve(&EuropeanOption::new(100.0, expiry, TypeFlag::Call))
        .unwrap();

    assert_approx_equal!(qdplus.price(), european.price(), 1e-10);
    assert_approx_equal!(qdplus.delta(), european.delta(), 1e-10);
    assert_approx_equal!(qdplus.gamma(), european.gamma(), 1e-10);
    assert_approx_equal!(qdplus.vega(), european.vega(), 1e-10);
    assert_approx_equal!(qdplus.theta(), european.theta(), 1e-10);
    assert_approx_equal!(qdplus.rho(), european.rho(), 1e-10);
    assert_approx_equal!(qdplus.psi(), european.psi(), 1e-10);

    assert!(qdplus.exercise_boundary(0.25).is_infinite());
}
