// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Solver facades.
//!
//! A solver is constructed once over a market (plus method parameters)
//! and applied to instruments. Inputs are validated here, at construction
//! and at instrument binding, so the engines' inner loops never check.
//! The returned handle erases the engine behind [`PricingMethod`] /
//! [`AmericanMethod`].

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::american::boundary_at_maturity;
use crate::analytic::{DualAnalyticMethod, PlainAnalyticMethod, VarAnalyticMethod};
use crate::crr::CrrPricing;
use crate::method::{AmericanMethod, ExpiredMethod, PricingMethod};
use crate::params::PricingParameters;
use crate::qdplus::QdPlusMethod;
use merton_error::MertonError;
use merton_instruments::{AmericanOption, EuropeanOption, MarketParameters, TypeFlag};
use std::marker::PhantomData;
use time::OffsetDateTime;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// VALIDATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Derive pricing parameters, rejecting inputs outside the numerical
/// domain (`S <= 0`, `K <= 0`, `sigma <= 0`, `tau < 0`).
pub(crate) fn validated_params(
    market: &MarketParameters,
    strike: f64,
    expiry: OffsetDateTime,
) -> Result<PricingParameters<f64>, MertonError> {
    if !(market.spot > 0.0) {
        return Err(MertonError::NumericalDomain(format!(
            "spot must be positive, got {}",
            market.spot
        )));
    }

    if !(strike > 0.0) {
        return Err(MertonError::NumericalDomain(format!(
            "strike must be positive, got {strike}"
        )));
    }

    if !(market.volatility > 0.0) {
        return Err(MertonError::NumericalDomain(format!(
            "volatility must be positive, got {}",
            market.volatility
        )));
    }

    let params = PricingParameters::from_market(market, strike, expiry);

    if params.tau < 0.0 {
        return Err(MertonError::NumericalDomain(format!(
            "expiry precedes the valuation instant (tau = {})",
            params.tau
        )));
    }

    Ok(params)
}

/// The degenerate handle for instruments binding at `tau = 0`.
fn expired(params: &PricingParameters<f64>, flag: TypeFlag) -> ExpiredMethod {
    ExpiredMethod {
        intrinsic: flag.payoff(params.K, params.S),
        maturity_boundary: boundary_at_maturity(params, flag),
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// ANALYTIC SOLVER
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Carrier selector: plain `f64` evaluation, analytic greek formulas.
pub struct Plain;

/// Carrier selector: forward-mode dual evaluation.
pub struct ForwardDual;

/// Carrier selector: reverse-mode tape evaluation.
pub struct ReverseVar;

/// A carrier mode of the analytic solver.
pub trait AnalyticMode {
    /// Build the pricing handle for this carrier.
    fn build(params: PricingParameters<f64>, flag: TypeFlag) -> Box<dyn PricingMethod>;
}

impl AnalyticMode for Plain {
    fn build(params: PricingParameters<f64>, flag: TypeFlag) -> Box<dyn PricingMethod> {
        Box::new(PlainAnalyticMethod::new(params, flag))
    }
}

impl AnalyticMode for ForwardDual {
    fn build(params: PricingParameters<f64>, flag: TypeFlag) -> Box<dyn PricingMethod> {
        Box::new(DualAnalyticMethod::new(params, flag))
    }
}

impl AnalyticMode for ReverseVar {
    fn build(params: PricingParameters<f64>, flag: TypeFlag) -> Box<dyn PricingMethod> {
        Box::new(VarAnalyticMethod::new(params, flag))
    }
}

/// Closed-form solver for European instruments, parametric over the
/// numeric carrier.
pub struct AnalyticSolver<Mode = Plain> {
    market: MarketParameters,
    _mode: PhantomData<Mode>,
}

impl<Mode: AnalyticMode> AnalyticSolver<Mode> {
    /// Construct the solver over a market.
    #[must_use]
    pub const fn new(market: MarketParameters) -> Self {
        Self {
            market,
            _mode: PhantomData,
        }
    }

    /// Price a European instrument.
    ///
    /// # Errors
    ///
    /// [`MertonError::NumericalDomain`] for inputs outside the domain.
    pub fn solve(&self, option: &EuropeanOption) -> Result<Box<dyn PricingMethod>, MertonError> {
        let params = validated_params(&self.market, option.strike, option.expiry)?;

        if params.tau == 0.0 {
            return Ok(Box::new(expired(&params, option.type_flag)));
        }

        Ok(Mode::build(params, option.type_flag))
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// CRR SOLVER
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Binomial lattice solver for European and American instruments.
pub struct CrrSolver {
    market: MarketParameters,
    steps: usize,
    extra_steps: usize,
}

impl CrrSolver {
    /// Construct the solver over a market with the given number of tree
    /// steps and an optional (even) root shift for smoother American
    /// boundary reconstruction.
    ///
    /// # Errors
    ///
    /// [`MertonError::NumericalDomain`] when `steps` is zero or
    /// `extra_steps` is odd.
    pub fn new(
        market: MarketParameters,
        steps: usize,
        extra_steps: usize,
    ) -> Result<Self, MertonError> {
        if steps == 0 {
            return Err(MertonError::NumericalDomain(
                "the lattice needs at least one step".to_string(),
            ));
        }

        if extra_steps % 2 != 0 {
            return Err(MertonError::NumericalDomain(format!(
                "extra_steps must be even, got {extra_steps}"
            )));
        }

        Ok(Self {
            market,
            steps,
            extra_steps,
        })
    }

    /// Price a European instrument on the lattice.
    ///
    /// # Errors
    ///
    /// [`MertonError::NumericalDomain`] for inputs outside the domain,
    /// [`MertonError::LatticeInfeasible`] when the tree is inadmissible.
    pub fn solve(&self, option: &EuropeanOption) -> Result<Box<dyn PricingMethod>, MertonError> {
        let params = validated_params(&self.market, option.strike, option.expiry)?;

        if params.tau == 0.0 {
            return Ok(Box::new(expired(&params, option.type_flag)));
        }

        Ok(Box::new(CrrPricing::european(
            params,
            option.type_flag,
            self.steps,
        )?))
    }

    /// Price an American option on the lattice, reconstructing its
    /// exercise boundary from the node-level exercise flags.
    ///
    /// # Errors
    ///
    /// As [`CrrSolver::solve`], plus
    /// [`MertonError::UnsupportedInstrument`] for American forwards.
    pub fn solve_american(
        &self,
        option: &AmericanOption,
    ) -> Result<Box<dyn AmericanMethod>, MertonError> {
        if option.type_flag == TypeFlag::Forward {
            return Err(MertonError::UnsupportedInstrument(
                "a forward has no early-exercise premium".to_string(),
            ));
        }

        let params = validated_params(&self.market, option.strike, option.expiry)?;

        if params.tau == 0.0 {
            return Ok(Box::new(expired(&params, option.type_flag)));
        }

        Ok(Box::new(CrrPricing::american(
            params,
            option.type_flag,
            self.steps,
            self.extra_steps,
        )?))
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// QD+ SOLVER
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// QD+ solver for American options. No method parameters.
pub struct QdPlusSolver {
    market: MarketParameters,
}

impl QdPlusSolver {
    /// Construct the solver over a market.
    #[must_use]
    pub const fn new(market: MarketParameters) -> Self {
        Self { market }
    }

    /// Price an American option by the QD+ approximation.
    ///
    /// # Errors
    ///
    /// [`MertonError::NumericalDomain`] for inputs outside the domain,
    /// [`MertonError::UnsupportedInstrument`] for American forwards.
    pub fn solve_american(
        &self,
        option: &AmericanOption,
    ) -> Result<Box<dyn AmericanMethod>, MertonError> {
        if option.type_flag == TypeFlag::Forward {
            return Err(MertonError::UnsupportedInstrument(
                "a forward has no early-exercise premium".to_string(),
            ));
        }

        let params = validated_params(&self.market, option.strike, option.expiry)?;

        if params.tau == 0.0 {
            return Ok(Box::new(expired(&params, option.type_flag)));
        }

        Ok(Box::new(QdPlusMethod::new(params, option.type_flag)?))
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
