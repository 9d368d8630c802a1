// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! The QD+ analytic approximation for American options.
//!
//! After Li (2009), "Analytical Approximations for the Critical Stock
//! Prices of American Options: A Performance Comparison". The critical
//! boundary solves a one-dimensional fixed-point equation by Newton (the
//! derivative comes from a forward-dual seed); the premium is then a
//! closed form in the frozen boundary. Evaluating that closed form over
//! the dual carrier, one seed per parameter, yields all greeks.
//!
//! On a Newton convergence failure the handle degrades gracefully: the
//! price falls back to the European premium, the greeks are NaN and the
//! boundary accessor reports the iterate at abort.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::american::{boundary_at_maturity, never_optimal_exercise};
use crate::kernels;
use crate::method::{AmericanMethod, PricingMethod};
use crate::params::{PricingParameters, Wrt};
use merton_autodiff::{Carrier, Dual64};
use merton_error::MertonError;
use merton_instruments::TypeFlag;
use merton_math::distributions::norm_cdf;
use merton_math::rootfinding::NewtonRaphson;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// CORE FORMULAS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// The QD+ coefficient set over a numeric carrier, with
/// `M = 2r / sigma^2` and `N = 2(r - q) / sigma^2`.
struct QdPlusCore<C: Carrier> {
    p: PricingParameters<C>,
    M: C,
    N: C,
    flag: TypeFlag,
}

impl<C: Carrier> QdPlusCore<C> {
    fn new(p: PricingParameters<C>, flag: TypeFlag) -> Self {
        let M = p.r * 2.0 / (p.sigma * p.sigma);
        let N = (p.r - p.q) * 2.0 / (p.sigma * p.sigma);

        Self { p, M, N, flag }
    }

    /// `q_QD(h) = -(N - 1 -/+ sqrt((N - 1)^2 + 4M/h)) / 2`
    /// (`-` root for calls, `+` for puts).
    fn q_qd(&self, h: C) -> C {
        let root = ((self.N - 1.0) * (self.N - 1.0) + self.M * 4.0 / h).sqrt();

        match self.flag {
            TypeFlag::Call => -(self.N - 1.0 - root) * 0.5,
            _ => -(self.N - 1.0 + root) * 0.5,
        }
    }

    /// `q_QD'(h) = M / (h^2 sqrt((N - 1)^2 + 4M/h))`
    fn q_qd_deriv(&self, h: C) -> C {
        self.M / (h * h * ((self.N - 1.0) * (self.N - 1.0) + self.M * 4.0 / h).sqrt())
    }

    /// `b(h) = (1 - h) M q_QD'(h) / (2 (2 q_QD + N - 1))`
    fn coeff_b(&self, h: C, qd: C, qdd: C) -> C {
        -(h - 1.0) * self.M * qdd * 0.5 / (qd * 2.0 + self.N - 1.0)
    }

    /// `c0 = -((1 - h) M / (2 q_QD + N - 1))
    ///       (1/h - Theta e^(r tau) / (r gap) + q_QD' / (2 q_QD + N - 1))`
    /// where `gap` is the intrinsic gap at the boundary and `Theta` the
    /// European put time-decay theta evaluated there.
    fn coeff_c0(&self, h: C, qd: C, qdd: C, boundary: C, tau: C, european: C) -> C {
        let denominator = qd * 2.0 + self.N - 1.0;
        let gap = self.intrinsic_gap(boundary, european);
        let theta = kernels::theta(&self.p.with_spot_and_tau(boundary, tau), -1.0);

        ((h - 1.0) * self.M / denominator)
            * (h.recip() - theta * (self.p.r * tau).exp() / (self.p.r * gap) + qdd / denominator)
    }

    /// The European premium re-evaluated at spot `s` and maturity `tau`.
    fn european_at(&self, s: C, tau: C) -> C {
        let shifted = self.p.with_spot_and_tau(s, tau);

        match self.flag {
            TypeFlag::Call => kernels::european_call(&shifted),
            _ => kernels::european_put(&shifted),
        }
    }

    /// `eta (S_b - K) - european(S_b)`: how far the boundary premium sits
    /// above the European one.
    fn intrinsic_gap(&self, boundary: C, european: C) -> C {
        match self.flag {
            TypeFlag::Call => boundary - self.p.K - european,
            _ => self.p.K - boundary - european,
        }
    }

    /// The fixed-point residual `F(S_b)` whose root is the critical
    /// boundary at time-to-maturity `tau`.
    fn boundary_function(&self, boundary: C, tau: C) -> C {
        let h = -((-self.p.r * tau).exp() - 1.0);
        let qd = self.q_qd(h);
        let qdd = self.q_qd_deriv(h);

        let eta = self.flag.eta();
        let d1 = kernels::d1(&self.p.with_spot_and_tau(boundary, tau));
        let european = self.european_at(boundary, tau);
        let c0 = self.coeff_c0(h, qd, qdd, boundary, tau, european);
        let gap = self.intrinsic_gap(boundary, european);

        (-((-self.p.q * tau).exp() * norm_cdf(d1 * eta) - 1.0) * boundary
            - (qd + c0) * gap * eta)
            .abs()
    }

    /// The premium with the critical boundary frozen as a constant.
    fn price_with_boundary(&self, boundary: C) -> C {
        let S = self.p.S;
        let call = matches!(self.flag, TypeFlag::Call);

        // Inside the exercise region the premium is the intrinsic value.
        if call && S.value() >= boundary.value() {
            return S - self.p.K;
        }
        if !call && S.value() <= boundary.value() {
            return self.p.K - S;
        }

        let european = self.european_at(S, self.p.tau);

        if never_optimal_exercise(&self.p.values(), self.flag) {
            return european;
        }

        let tau = self.p.tau;
        let h = -((-self.p.r * tau).exp() - 1.0);
        let qd = self.q_qd(h);
        let qdd = self.q_qd_deriv(h);
        let b = self.coeff_b(h, qd, qdd);
        let european_boundary = self.european_at(boundary, tau);
        let c = self.coeff_c0(h, qd, qdd, boundary, tau, european_boundary);
        let gap = self.intrinsic_gap(boundary, european_boundary);
        let log_s_b = (S / boundary).ln();

        // european + gap / (1 - b ln^2 - c ln) * (S / S_b)^q_QD
        european
            + gap / (-(b * log_s_b * log_s_b + c * log_s_b - 1.0)) * (qd * log_s_b).exp()
    }
}

/// Solve the QD+ fixed point for the critical boundary at
/// time-to-maturity `tau`, starting from `S_b = K`.
pub(crate) fn critical_boundary(
    params: &PricingParameters<f64>,
    flag: TypeFlag,
    tau: f64,
) -> Result<f64, MertonError> {
    if never_optimal_exercise(params, flag) {
        return Ok(match flag {
            TypeFlag::Call => f64::INFINITY,
            _ => 0.0,
        });
    }

    if tau == 0.0 {
        return Ok(boundary_at_maturity(params, flag));
    }

    let evaluate = |boundary: f64| -> Dual64 {
        QdPlusCore::new(params.constants(), flag)
            .boundary_function(Dual64::variable(boundary), Dual64::constant(tau))
    };

    NewtonRaphson::new(
        |boundary| evaluate(boundary).value(),
        |boundary| evaluate(boundary).first(),
        params.K,
    )
    .solve()
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// PRICING HANDLE
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// QD+ pricing handle. All sensitivities are computed at construction
/// against the boundary solved for the instrument's own maturity.
pub struct QdPlusMethod {
    params: PricingParameters<f64>,
    flag: TypeFlag,
    price_: f64,
    delta_: f64,
    gamma_: f64,
    vega_: f64,
    theta_: f64,
    rho_: f64,
    psi_: f64,
}

impl QdPlusMethod {
    /// Solve the boundary and differentiate the premium reconstruction.
    pub(crate) fn new(params: PricingParameters<f64>, flag: TypeFlag) -> Result<Self, MertonError> {
        match critical_boundary(&params, flag, params.tau) {
            Ok(boundary) => {
                let premium = |wrt: Wrt| -> Dual64 {
                    QdPlusCore::new(params.seeded(wrt), flag)
                        .price_with_boundary(Dual64::constant(boundary))
                };

                let spot = premium(Wrt::Spot);

                Ok(Self {
                    params,
                    flag,
                    price_: spot.value(),
                    delta_: spot.first(),
                    gamma_: spot.second(),
                    vega_: premium(Wrt::Volatility).first(),
                    theta_: -premium(Wrt::TimeToMaturity).first(),
                    rho_: premium(Wrt::Rate).first(),
                    psi_: premium(Wrt::DividendYield).first(),
                })
            }
            Err(MertonError::ConvergenceFailure {
                iterations,
                last_iterate,
            }) => {
                log::warn!(
                    "QD+ boundary Newton stopped at {last_iterate} after {iterations} \
                     iterations; reporting the European premium and NaN greeks"
                );

                let core = QdPlusCore::new(params.constants(), flag);
                let price_ = core.european_at(Dual64::constant(params.S), Dual64::constant(params.tau));

                Ok(Self {
                    params,
                    flag,
                    price_: price_.value(),
                    delta_: f64::NAN,
                    gamma_: f64::NAN,
                    vega_: f64::NAN,
                    theta_: f64::NAN,
                    rho_: f64::NAN,
                    psi_: f64::NAN,
                })
            }
            Err(error) => Err(error),
        }
    }
}

impl PricingMethod for QdPlusMethod {
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

impl AmericanMethod for QdPlusMethod {
    fn exercise_boundary(&self, tau_prime: f64) -> f64 {
        if !(0.0..=self.params.tau).contains(&tau_prime) {
            return f64::NAN;
        }

        match critical_boundary(&self.params, self.flag, tau_prime) {
            Ok(boundary) => boundary,
            Err(MertonError::ConvergenceFailure { last_iterate, .. }) => last_iterate,
            Err(_) => f64::NAN,
        }
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
