// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Closed-form pricing over the three numeric carriers.
//!
//! The same kernels back three handles:
//! - [`PlainAnalyticMethod`]: the analytic-greek formulas over `f64`;
//! - [`DualAnalyticMethod`]: one second-order spot-seeded forward-dual
//!   evaluation (price, delta, gamma) plus one first-order evaluation per
//!   remaining greek, all precomputed at construction;
//! - [`VarAnalyticMethod`]: a reverse-mode tape per accessor call; first
//!   order from one backward sweep over the price, gamma by sweeping the
//!   closed-form delta.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::kernels;
use crate::method::PricingMethod;
use crate::params::{PricingParameters, Wrt};
use merton_autodiff::{Accumulate, Carrier, Dual64, Gradient, Graph, Variable};
use merton_instruments::TypeFlag;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// SHARED DISPATCH
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Premium of a European payoff kind over any carrier.
#[inline]
pub(crate) fn european_premium<C: Carrier>(p: &PricingParameters<C>, flag: TypeFlag) -> C {
    match flag {
        TypeFlag::Forward => kernels::forward_price(p),
        TypeFlag::Call => kernels::european_call(p),
        TypeFlag::Put => kernels::european_put(p),
    }
}

/// The spot-sensitivity expression of a European payoff kind: the
/// closed-form delta, used by reverse mode to reach second order.
#[inline]
fn delta_expression<C: Carrier>(p: &PricingParameters<C>, flag: TypeFlag) -> C {
    match flag {
        TypeFlag::Forward => (-p.q * p.tau).exp(),
        TypeFlag::Call | TypeFlag::Put => kernels::delta(p, flag.eta()),
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// PLAIN f64 ENGINE
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Closed-form pricing over plain `f64`: the analytic greek formulas.
pub struct PlainAnalyticMethod {
    params: PricingParameters<f64>,
    flag: TypeFlag,
}

impl PlainAnalyticMethod {
    /// New plain analytic handle.
    #[must_use]
    pub const fn new(params: PricingParameters<f64>, flag: TypeFlag) -> Self {
        Self { params, flag }
    }
}

impl PricingMethod for PlainAnalyticMethod {
    fn price(&self) -> f64 {
        european_premium(&self.params, self.flag)
    }

    fn delta(&self) -> f64 {
        delta_expression(&self.params, self.flag)
    }

    fn gamma(&self) -> f64 {
        match self.flag {
            TypeFlag::Forward => 0.0,
            _ => kernels::gamma(&self.params),
        }
    }

    fn vega(&self) -> f64 {
        match self.flag {
            TypeFlag::Forward => 0.0,
            _ => kernels::vega(&self.params),
        }
    }

    fn theta(&self) -> f64 {
        let p = &self.params;
        match self.flag {
            // -d/dtau of S e^(-q tau) - K e^(-r tau).
            TypeFlag::Forward => {
                p.q * p.S * (-p.q * p.tau).exp() - p.r * p.K * (-p.r * p.tau).exp()
            }
            _ => kernels::theta(p, self.flag.eta()),
        }
    }

    fn rho(&self) -> f64 {
        let p = &self.params;
        match self.flag {
            TypeFlag::Forward => p.tau * p.K * (-p.r * p.tau).exp(),
            _ => kernels::rho(p, self.flag.eta()),
        }
    }

    fn psi(&self) -> f64 {
        let p = &self.params;
        match self.flag {
            TypeFlag::Forward => -p.tau * p.S * (-p.q * p.tau).exp(),
            _ => kernels::psi(p, self.flag.eta()),
        }
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// FORWARD-DUAL ENGINE
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Closed-form pricing differentiated by forward-mode duals.
///
/// All sensitivities are computed once at construction; the accessors
/// return cached values.
pub struct DualAnalyticMethod {
    price_: f64,
    delta_: f64,
    gamma_: f64,
    vega_: f64,
    theta_: f64,
    rho_: f64,
    psi_: f64,
}

impl DualAnalyticMethod {
    /// New forward-dual analytic handle.
    #[must_use]
    pub fn new(params: PricingParameters<f64>, flag: TypeFlag) -> Self {
        let premium = |wrt: Wrt| -> Dual64 { european_premium(&params.seeded(wrt), flag) };

        let spot = premium(Wrt::Spot);

        Self {
            price_: spot.value(),
            delta_: spot.first(),
            gamma_: spot.second(),
            vega_: premium(Wrt::Volatility).first(),
            theta_: -premium(Wrt::TimeToMaturity).first(),
            rho_: premium(Wrt::Rate).first(),
            psi_: premium(Wrt::DividendYield).first(),
        }
    }
}

impl PricingMethod for DualAnalyticMethod {
    fn price(&self) -> f64 {
        self.price_
    }

    fn delta(&self) -> f64 {
        self.delta_
    }

    fn gamma(&self) -> f64 {
        self.gamma_
    }

    fn vega(&self) -> f64 {
        self.vega_
    }

    fn theta(&self) -> f64 {
        self.theta_
    }

    fn rho(&self) -> f64 {
        self.rho_
    }

    fn psi(&self) -> f64 {
        self.psi_
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// REVERSE-VAR ENGINE
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Closed-form pricing differentiated by a reverse-mode sweep.
///
/// Each accessor records a fresh tape, evaluates the kernel over it and
/// runs one backward pass; the tape is freed when the accessor returns.
pub struct VarAnalyticMethod {
    params: PricingParameters<f64>,
    flag: TypeFlag,
}

impl VarAnalyticMethod {
    /// New reverse-mode analytic handle.
    #[must_use]
    pub const fn new(params: PricingParameters<f64>, flag: TypeFlag) -> Self {
        Self { params, flag }
    }

    /// Record the premium on a fresh tape and return the derivative with
    /// respect to the chosen leaf.
    fn premium_derivative(&self, wrt: Wrt) -> f64 {
        let graph = Graph::new();
        let recorded = self.params.recorded(&graph);
        let premium = european_premium(&recorded, self.flag);
        let adjoints = premium.accumulate();

        adjoints.wrt(&leaf(&recorded, wrt))
    }
}

/// Select the tape leaf corresponding to a pricing parameter.
fn leaf<'v>(p: &PricingParameters<Variable<'v>>, wrt: Wrt) -> Variable<'v> {
    match wrt {
        Wrt::Spot => p.S,
        Wrt::Volatility => p.sigma,
        Wrt::TimeToMaturity => p.tau,
        Wrt::Rate => p.r,
        Wrt::DividendYield => p.q,
    }
}

impl PricingMethod for VarAnalyticMethod {
    fn price(&self) -> f64 {
        let graph = Graph::new();
        let recorded = self.params.recorded(&graph);

        european_premium(&recorded, self.flag).value
    }

    fn delta(&self) -> f64 {
        self.premium_derivative(Wrt::Spot)
    }

    fn gamma(&self) -> f64 {
        // Second order: sweep the closed-form delta instead of the price.
        let graph = Graph::new();
        let recorded = self.params.recorded(&graph);
        let delta_expr = delta_expression(&recorded, self.flag);
        let adjoints = delta_expr.accumulate();

        adjoints.wrt(&recorded.S)
    }

    fn vega(&self) -> f64 {
        self.premium_derivative(Wrt::Volatility)
    }

    fn theta(&self) -> f64 {
        -self.premium_derivative(Wrt::TimeToMaturity)
    }

    fn rho(&self) -> f64 {
        self.premium_derivative(Wrt::Rate)
    }

    fn psi(&self) -> f64 {
        self.premium_derivative(Wrt::DividendYield)
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

#[cfg(test)]
mod tests_analytic {
    use super::*;
    use merton_utils::assert_approx_equal;

    fn scenario() -> PricingParameters<f64> {
        PricingParameters {
            S: 100.0,
            K: 100.0,
            sigma: 0.20,
            tau: 0.5,
            r: 0.02,
            q: 0.01,
        }
    }

    #[test]
    fn test_three_engines_agree() {
        let p = scenario();

        let plain = PlainAnalyticMethod::new(p, TypeFlag::Put);
        let dual = DualAnalyticMethod::new(p, TypeFlag::Put);
        let var = VarAnalyticMethod::new(p, TypeFlag::Put);

        assert_approx_equal!(plain.price(), dual.price(), 1e-10);
        assert_approx_equal!(plain.price(), var.price(), 1e-10);

        assert_approx_equal!(plain.delta(), dual.delta(), 1e-10);
        assert_approx_equal!(plain.delta(), var.delta(), 1e-10);

        assert_approx_equal!(plain.gamma(), dual.gamma(), 1e-10);
        assert_approx_equal!(plain.gamma(), var.gamma(), 1e-10);

        assert_approx_equal!(plain.vega(), dual.vega(), 1e-10);
        assert_approx_equal!(plain.vega(), var.vega(), 1e-10);

        assert_approx_equal!(plain.theta(), dual.theta(), 1e-10);
        assert_approx_equal!(plain.theta(), var.theta(), 1e-10);

        assert_approx_equal!(plain.rho(), dual.rho(), 1e-10);
        assert_approx_equal!(plain.rho(), var.rho(), 1e-10);

        assert_approx_equal!(plain.psi(), dual.psi(), 1e-10);
        assert_approx_equal!(plain.psi(), var.psi(), 1e-10);
    }

    #[test]
    fn test_put_reference_values() {
        let put = PlainAnalyticMethod::new(scenario(), TypeFlag::Put);

        assert_approx_equal!(put.price(), 5.3504528757, 1e-9);
        assert_approx_equal!(put.delta(), -0.4554818745, 1e-9);
        assert_approx_equal!(put.gamma(), 0.0279113405, 1e-9);
    }

    #[test]
    fn test_forward_greeks() {
        let p = scenario();

        let plain = PlainAnalyticMethod::new(p, TypeFlag::Forward);
        let dual = DualAnalyticMethod::new(p, TypeFlag::Forward);
        let var = VarAnalyticMethod::new(p, TypeFlag::Forward);

        assert_approx_equal!(plain.delta(), (-p.q * p.tau).exp(), 1e-15);
        assert_approx_equal!(plain.gamma(), 0.0, 1e-15);
        assert_approx_equal!(plain.vega(), 0.0, 1e-15);

        assert_approx_equal!(plain.delta(), dual.delta(), 1e-12);
        assert_approx_equal!(plain.delta(), var.delta(), 1e-12);
        assert_approx_equal!(plain.theta(), dual.theta(), 1e-12);
        assert_approx_equal!(plain.theta(), var.theta(), 1e-12);
        assert_approx_equal!(plain.rho(), dual.rho(), 1e-12);
        assert_approx_equal!(plain.rho(), var.rho(), 1e-12);
        assert_approx_equal!(plain.psi(), dual.psi(), 1e-12);
        assert_approx_equal!(plain.psi(), var.psi(), 1e-12);
    }
}
