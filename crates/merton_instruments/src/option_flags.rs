// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Payoff kind flags.
//!
//! The payoff kinds form a closed tagged sum; every engine dispatches over
//! this enum once at instrument binding, never inside an inner loop.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use merton_autodiff::Carrier;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// ENUM AND IMPLEMENTATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Payoff kind of a vanilla instrument.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypeFlag {
    /// Forward: pays `x - K` on terminal spot `x`.
    Forward,
    /// Call: pays `max(x - K, 0)`.
    Call,
    /// Put: pays `max(K - x, 0)`.
    Put,
}

impl TypeFlag {
    /// Payoff on the terminal spot, over any numeric carrier.
    ///
    /// ```
    /// # use merton_instruments::TypeFlag;
    ///
    /// assert_eq!(TypeFlag::Call.payoff(100.0, 110.0_f64), 10.0);
    /// assert_eq!(TypeFlag::Put.payoff(100.0, 110.0_f64), 0.0);
    /// assert_eq!(TypeFlag::Forward.payoff(100.0, 90.0_f64), -10.0);
    /// ```
    #[inline]
    pub fn payoff<C: Carrier>(&self, strike: f64, underlying: C) -> C {
        match self {
            Self::Forward => underlying - strike,
            Self::Call => {
                let moneyness = underlying - strike;
                moneyness.max(moneyness * 0.0)
            }
            Self::Put => {
                let moneyness = -underlying + strike;
                moneyness.max(moneyness * 0.0)
            }
        }
    }

    /// The payoff sign `eta` used by the closed-form greeks:
    /// `+1` for calls (and forwards), `-1` for puts.
    #[must_use]
    #[inline]
    pub const fn eta(&self) -> f64 {
        match self {
            Self::Forward | Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
