// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Vanilla European and American instruments.
//!
//! The exercise style is encoded in the type: engines that cannot exercise
//! early accept [`EuropeanOption`], engines that can accept
//! [`AmericanOption`]. Forwards are European by construction (a
//! [`TypeFlag::Forward`] inside an [`AmericanOption`] is rejected by every
//! solver).

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::option_flags::TypeFlag;
use merton_autodiff::Carrier;
use time::OffsetDateTime;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCTS AND IMPLEMENTATIONS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// A vanilla instrument exercisable only at maturity.
#[derive(Clone, Copy, Debug)]
pub struct EuropeanOption {
    /// K - The strike price. Must be positive.
    pub strike: f64,

    /// T - The expiry instant.
    pub expiry: OffsetDateTime,

    /// The payoff kind (forward, call or put).
    pub type_flag: TypeFlag,
}

/// A vanilla option exercisable at any time up to and including maturity.
#[derive(Clone, Copy, Debug)]
pub struct AmericanOption {
    /// K - The strike price. Must be positive.
    pub strike: f64,

    /// T - The expiry instant.
    pub expiry: OffsetDateTime,

    /// The payoff kind (call or put; forwards have no early exercise).
    pub type_flag: TypeFlag,
}

impl EuropeanOption {
    /// New European vanilla instrument.
    #[must_use]
    pub const fn new(strike: f64, expiry: OffsetDateTime, type_flag: TypeFlag) -> Self {
        Self {
            strike,
            expiry,
            type_flag,
        }
    }

    /// Payoff on the terminal spot.
    #[inline]
    pub fn payoff<C: Carrier>(&self, underlying: C) -> C {
        self.type_flag.payoff(self.strike, underlying)
    }
}

impl AmericanOption {
    /// New American vanilla option.
    #[must_use]
    pub const fn new(strike: f64, expiry: OffsetDateTime, type_flag: TypeFlag) -> Self {
        Self {
            strike,
            expiry,
            type_flag,
        }
    }

    /// Payoff on immediate exercise at the given spot.
    #[inline]
    pub fn payoff<C: Carrier>(&self, underlying: C) -> C {
        self.type_flag.payoff(self.strike, underlying)
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
