// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Implied quantities: volatility from an observed premium, dividend
//! yield from an observed forward.
//!
//! Both invert the closed-form kernels by Newton; the derivative of the
//! residual comes from a forward-dual seed of the quantity being solved
//! for, so no finite differences are involved.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::analytic::european_premium;
use crate::kernels;
use crate::params::{PricingParameters, Wrt};
use crate::solver::validated_params;
use merton_autodiff::Dual64;
use merton_error::MertonError;
use merton_instruments::{EuropeanOption, MarketParameters, TypeFlag};
use merton_math::rootfinding::NewtonRaphson;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// CONSTANTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Initial guess for the implied volatility search.
const VOLATILITY_GUESS: f64 = 0.10;

/// Initial guess for the implied dividend yield search.
const DIVIDEND_GUESS: f64 = 0.0;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// FUNCTIONS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// The volatility at which the closed-form premium of `option` matches
/// the observed price. Newton from `sigma = 0.10`; the residual
/// derivative is the (signed) vega from a dual seed.
///
/// # Errors
///
/// [`MertonError::ConvergenceFailure`] or [`MertonError::NumericalDomain`]
/// from the Newton iteration, or invalid market/instrument inputs.
pub fn implied_volatility(
    market: &MarketParameters,
    option: &EuropeanOption,
    observed_price: f64,
) -> Result<f64, MertonError> {
    let base = validated_params(market, option.strike, option.expiry)?;
    let flag = option.type_flag;

    let residual = move |sigma: f64| -> Dual64 {
        let seeded = PricingParameters { sigma, ..base }.seeded(Wrt::Volatility);

        (european_premium(&seeded, flag) - observed_price).abs()
    };

    NewtonRaphson::new(
        move |sigma| residual(sigma).value(),
        move |sigma| residual(sigma).first(),
        VOLATILITY_GUESS,
    )
    .solve()
}

/// The dividend yield at which the closed-form forward price of
/// `instrument` matches the observed forward. Newton from `q = 0`.
///
/// # Errors
///
/// [`MertonError::UnsupportedInstrument`] unless the instrument is a
/// forward, otherwise as [`implied_volatility`].
pub fn implied_dividend_yield(
    market: &MarketParameters,
    instrument: &EuropeanOption,
    observed_forward: f64,
) -> Result<f64, MertonError> {
    if instrument.type_flag != TypeFlag::Forward {
        return Err(MertonError::UnsupportedInstrument(
            "implied dividend yield requires a forward".to_string(),
        ));
    }

    let base = validated_params(market, instrument.strike, instrument.expiry)?;

    let residual = move |q: f64| -> Dual64 {
        let seeded = PricingParameters { q, ..base }.seeded(Wrt::DividendYield);

        (kernels::forward_price(&seeded) - observed_forward).abs()
    };

    NewtonRaphson::new(
        move |q| residual(q).value(),
        move |q| residual(q).first(),
        DIVIDEND_GUESS,
    )
    .solve()
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
