// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Closed-form Black-Scholes-Merton kernels.
//!
//! The single source of truth for the closed forms: every engine prices
//! and differentiates through these functions, none re-derives them.
//! Written once over the abstract [`Carrier`], so the same expression tree
//! evaluates to plain prices (`f64`), forward-mode jets ([`merton_autodiff::Dual64`])
//! or reverse-mode tape nodes ([`merton_autodiff::Variable`]).
//!
//! The greek formulas carry the payoff sign `eta` (+1 call, -1 put).
//! Theta is the time-decay form `-dPrice/dtau`, which is the reported
//! convention throughout the engine; autodiff paths negate their raw
//! `dPrice/dtau` to match it.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::params::PricingParameters;
use merton_autodiff::Carrier;
use merton_math::distributions::{norm_cdf, norm_pdf};

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// PRICES
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// `d1 = (ln(S/K) + (r - q + sigma^2/2) tau) / (sigma sqrt(tau))`
#[inline]
pub fn d1<C: Carrier>(p: &PricingParameters<C>) -> C {
    ((p.S / p.K).ln() + (p.r - p.q + p.sigma * p.sigma * 0.5) * p.tau) / (p.sigma * p.tau.sqrt())
}

/// `d2 = d1 - sigma sqrt(tau)`
#[inline]
pub fn d2<C: Carrier>(p: &PricingParameters<C>) -> C {
    d1(p) - p.sigma * p.tau.sqrt()
}

/// Forward price, `S e^(-q tau) - K e^(-r tau)`.
#[inline]
pub fn forward_price<C: Carrier>(p: &PricingParameters<C>) -> C {
    p.S * (-p.q * p.tau).exp() - p.K * (-p.r * p.tau).exp()
}

/// European call premium, `S e^(-q tau) Phi(d1) - K e^(-r tau) Phi(d2)`.
#[inline]
pub fn european_call<C: Carrier>(p: &PricingParameters<C>) -> C {
    p.S * (-p.q * p.tau).exp() * norm_cdf(d1(p)) - p.K * (-p.r * p.tau).exp() * norm_cdf(d2(p))
}

/// European put premium, `K e^(-r tau) Phi(-d2) - S e^(-q tau) Phi(-d1)`.
#[inline]
pub fn european_put<C: Carrier>(p: &PricingParameters<C>) -> C {
    p.K * (-p.r * p.tau).exp() * norm_cdf(-d2(p)) - p.S * (-p.q * p.tau).exp() * norm_cdf(-d1(p))
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// ANALYTIC GREEKS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// `delta = eta e^(-q tau) Phi(eta d1)`
#[inline]
pub fn delta<C: Carrier>(p: &PricingParameters<C>, eta: f64) -> C {
    (-p.q * p.tau).exp() * norm_cdf(d1(p) * eta) * eta
}

/// `gamma = e^(-q tau) phi(d1) / (S sigma sqrt(tau))`
#[inline]
pub fn gamma<C: Carrier>(p: &PricingParameters<C>) -> C {
    (-p.q * p.tau).exp() * norm_pdf(d1(p)) / (p.S * p.sigma * p.tau.sqrt())
}

/// `vega = S e^(-q tau) phi(d1) sqrt(tau)`
#[inline]
pub fn vega<C: Carrier>(p: &PricingParameters<C>) -> C {
    p.S * (-p.q * p.tau).exp() * norm_pdf(d1(p)) * p.tau.sqrt()
}

/// Time-decay theta (`-dPrice/dtau`):
/// `theta = -eta r K e^(-r tau) Phi(eta d2) + eta q S e^(-q tau) Phi(eta d1)
///          - sigma S e^(-q tau) phi(d1) / (2 sqrt(tau))`
#[inline]
pub fn theta<C: Carrier>(p: &PricingParameters<C>, eta: f64) -> C {
    -(p.r * p.K * (-p.r * p.tau).exp() * norm_cdf(d2(p) * eta) * eta)
        + p.q * p.S * (-p.q * p.tau).exp() * norm_cdf(d1(p) * eta) * eta
        - p.sigma * p.S * (-p.q * p.tau).exp() * norm_pdf(d1(p)) / p.tau.sqrt() * 0.5
}

/// `rho = eta K tau e^(-r tau) Phi(eta d2)`
#[inline]
pub fn rho<C: Carrier>(p: &PricingParameters<C>, eta: f64) -> C {
    p.K * p.tau * (-p.r * p.tau).exp() * norm_cdf(d2(p) * eta) * eta
}

/// `psi = -eta S tau e^(-q tau) Phi(eta d1)`
#[inline]
pub fn psi<C: Carrier>(p: &PricingParameters<C>, eta: f64) -> C {
    -(p.S * p.tau * (-p.q * p.tau).exp() * norm_cdf(d1(p) * eta) * eta)
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
