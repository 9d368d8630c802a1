// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Error taxonomy for the merton workspace.
//!
//! Errors are values: solvers return them at construction or instrument
//! binding, never from the inner pricing loops. The QD+ engine additionally
//! recovers from [`MertonError::ConvergenceFailure`] by falling back to the
//! European premium, which is why that variant carries the aborted Newton
//! iterate.

use thiserror::Error;

/// Error enum for the merton workspace.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MertonError {
    /// The binomial lattice is inadmissible: the risk-neutral up-move
    /// probability left the open interval (0, 1) for the chosen
    /// volatility, carry and step size.
    #[error("infeasible lattice: up-move probability {probability} is outside (0, 1)")]
    LatticeInfeasible {
        /// The offending risk-neutral probability.
        probability: f64,
    },

    /// The Newton-Raphson iteration exhausted its budget without
    /// reaching the target accuracy.
    #[error("Newton-Raphson failed to converge after {iterations} iterations (last iterate {last_iterate})")]
    ConvergenceFailure {
        /// Number of iterations performed.
        iterations: usize,
        /// The iterate at abort.
        last_iterate: f64,
    },

    /// An input or intermediate value left the numerical domain of the
    /// computation (non-positive spot, strike or volatility, negative
    /// time-to-maturity, vanishing derivative, ...).
    #[error("numerical domain violation: {0}")]
    NumericalDomain(String),

    /// The selected pricing method does not implement the requested
    /// payoff kind.
    #[error("unsupported instrument: {0}")]
    UnsupportedInstrument(String),
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
