// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Market parameters of the Black-Scholes-Merton diffusion.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use time::OffsetDateTime;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCT AND IMPLEMENTATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Market state observed at a valuation instant.
#[derive(Clone, Copy, Debug, derive_builder::Builder)]
pub struct MarketParameters {
    /// S - The spot price of the underlying. Must be positive.
    pub spot: f64,

    /// sigma - The annualised volatility of the underlying. Must be positive.
    pub volatility: f64,

    /// t - The valuation instant.
    pub valuation: OffsetDateTime,

    /// r - The continuously compounded risk-free rate.
    pub rate: f64,

    /// q - The continuously compounded dividend (or convenience) yield.
    pub dividend_yield: f64,
}

impl MarketParameters {
    /// New market parameters.
    #[must_use]
    pub const fn new(
        spot: f64,
        volatility: f64,
        valuation: OffsetDateTime,
        rate: f64,
        dividend_yield: f64,
    ) -> Self {
        Self {
            spot,
            volatility,
            valuation,
            rate,
            dividend_yield,
        }
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
