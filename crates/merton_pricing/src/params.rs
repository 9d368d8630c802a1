// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Pricing parameters derived from a market and an instrument.
//!
//! `(S, K, sigma, tau, r, q)` over an arbitrary numeric carrier, where
//! `tau` is the year fraction between the valuation instant and expiry.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use merton_autodiff::{Carrier, Dual64, Graph, Variable};
use merton_instruments::MarketParameters;
use merton_time::year_fraction;
use time::OffsetDateTime;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCTS, ENUMS AND IMPLEMENTATIONS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Derived pricing parameters over the numeric carrier `C`.
#[derive(Clone, Copy, Debug)]
pub struct PricingParameters<C> {
    /// S - Spot price of the underlying.
    pub S: C,
    /// K - Strike price.
    pub K: C,
    /// sigma - Annualised volatility.
    pub sigma: C,
    /// tau - Time to maturity as a year fraction.
    pub tau: C,
    /// r - Continuously compounded risk-free rate.
    pub r: C,
    /// q - Continuously compounded dividend yield.
    pub q: C,
}

/// The pricing parameter a forward-mode evaluation is seeded in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Wrt {
    /// Seed the spot (delta, gamma).
    Spot,
    /// Seed the volatility (vega).
    Volatility,
    /// Seed the time to maturity (theta).
    TimeToMaturity,
    /// Seed the risk-free rate (rho).
    Rate,
    /// Seed the dividend yield (psi).
    DividendYield,
}

impl<C: Carrier> PricingParameters<C> {
    /// A copy of the parameters with the spot and time-to-maturity
    /// replaced. Used wherever a formula is re-evaluated at the exercise
    /// boundary.
    #[must_use]
    #[inline]
    pub fn with_spot_and_tau(&self, S: C, tau: C) -> Self {
        Self {
            S,
            tau,
            ..*self
        }
    }

    /// Project every parameter back onto `f64`.
    #[must_use]
    pub fn values(&self) -> PricingParameters<f64> {
        PricingParameters {
            S: self.S.value(),
            K: self.K.value(),
            sigma: self.sigma.value(),
            tau: self.tau.value(),
            r: self.r.value(),
            q: self.q.value(),
        }
    }
}

impl PricingParameters<f64> {
    /// Derive pricing parameters from a market and an instrument's strike
    /// and expiry.
    #[must_use]
    pub fn from_market(market: &MarketParameters, strike: f64, expiry: OffsetDateTime) -> Self {
        Self {
            S: market.spot,
            K: strike,
            sigma: market.volatility,
            tau: year_fraction(market.valuation, expiry),
            r: market.rate,
            q: market.dividend_yield,
        }
    }

    /// Lift into the forward-dual carrier with the chosen parameter
    /// seeded (`dx/dx = 1`) and the rest held constant.
    #[must_use]
    pub fn seeded(&self, wrt: Wrt) -> PricingParameters<Dual64> {
        let mut lifted = self.constants();

        match wrt {
            Wrt::Spot => lifted.S = Dual64::variable(self.S),
            Wrt::Volatility => lifted.sigma = Dual64::variable(self.sigma),
            Wrt::TimeToMaturity => lifted.tau = Dual64::variable(self.tau),
            Wrt::Rate => lifted.r = Dual64::variable(self.r),
            Wrt::DividendYield => lifted.q = Dual64::variable(self.q),
        }

        lifted
    }

    /// Lift into the forward-dual carrier with every parameter constant.
    #[must_use]
    pub fn constants(&self) -> PricingParameters<Dual64> {
        PricingParameters {
            S: Dual64::constant(self.S),
            K: Dual64::constant(self.K),
            sigma: Dual64::constant(self.sigma),
            tau: Dual64::constant(self.tau),
            r: Dual64::constant(self.r),
            q: Dual64::constant(self.q),
        }
    }

    /// Record the parameters as leaves on a reverse-mode tape.
    #[must_use]
    pub fn recorded<'v>(&self, graph: &'v Graph) -> PricingParameters<Variable<'v>> {
        PricingParameters {
            S: graph.var(self.S),
            K: graph.var(self.K),
            sigma: graph.var(self.sigma),
            tau: graph.var(self.tau),
            r: graph.var(self.r),
            q: graph.var(self.q),
        }
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

#[cfg(test)]
mod tests_params {
    use super::*;
    use merton_time::years;
    use merton_utils::assert_approx_equal;
    use time::macros::datetime;

    fn market() -> MarketParameters {
        MarketParameters::new(100.0, 0.2, datetime!(2024-01-02 0:00 UTC), 0.01, 0.05)
    }

    #[test]
    fn test_from_market() {
        let market = market();
        let expiry = market.valuation + years(0.5);
        let params = PricingParameters::from_market(&market, 110.0, expiry);

        assert_approx_equal!(params.tau, 0.5, 1e-12);
        assert_approx_equal!(params.K, 110.0, 1e-15);
        assert_approx_equal!(params.S, 100.0, 1e-15);
    }

    #[test]
    fn test_seeded() {
        let market = market();
        let params =
            PricingParameters::from_market(&market, 110.0, market.valuation + years(0.5));

        let lifted = params.seeded(Wrt::Volatility);

        assert_approx_equal!(lifted.sigma.first(), 1.0, 1e-15);
        assert_approx_equal!(lifted.S.first(), 0.0, 1e-15);
    }

    #[test]
    fn test_with_spot_and_tau() {
        let market = market();
        let params =
            PricingParameters::from_market(&market, 110.0, market.valuation + years(0.5));

        let shifted = params.with_spot_and_tau(95.0, 0.25);

        assert_approx_equal!(shifted.S, 95.0, 1e-15);
        assert_approx_equal!(shifted.tau, 0.25, 1e-15);
        assert_approx_equal!(shifted.K, params.K, 1e-15);
    }
}
