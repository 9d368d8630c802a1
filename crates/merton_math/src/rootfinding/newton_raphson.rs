// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Newton-Raphson iteration with a caller-supplied analytic derivative.
//!
//! The derivative is expected to come from an autodiff carrier (a
//! [`merton_autodiff::Dual64`] seed or a reverse sweep), not from finite
//! differences. The iteration stops on `|f(x)| < ACCURACY` and fails as a
//! value: [`MertonError::ConvergenceFailure`] when the budget is exhausted,
//! [`MertonError::NumericalDomain`] when the derivative vanishes or leaves
//! the finite range.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use merton_error::MertonError;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCT AND IMPLEMENTATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Newton-Raphson root-finding algorithm.
pub struct NewtonRaphson<F, G>
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    function: F,
    derivative: G,
    guess: f64,
}

impl<F, G> NewtonRaphson<F, G>
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    /// Iteration budget.
    pub const MAX_ITERATIONS: usize = 100;

    /// Target accuracy on `|f(x)|`.
    pub const ACCURACY: f64 = 1e-9;

    /// Create a new Newton-Raphson solver.
    pub const fn new(function: F, derivative: G, guess: f64) -> Self {
        Self {
            function,
            derivative,
            guess,
        }
    }

    /// Run the iteration `x <- x - f(x) / f'(x)`.
    ///
    /// # Errors
    ///
    /// - [`MertonError::ConvergenceFailure`] after [`Self::MAX_ITERATIONS`]
    ///   iterations, carrying the iterate at abort.
    /// - [`MertonError::NumericalDomain`] when `f'(x)` is zero or
    ///   non-finite.
    pub fn solve(&self) -> Result<f64, MertonError> {
        let mut x = self.guess;

        for iteration in 0..Self::MAX_ITERATIONS {
            let f = (self.function)(x);

            if f.abs() < Self::ACCURACY {
                log::trace!("Newton-Raphson converged after {iteration} iterations");
                return Ok(x);
            }

            let df = (self.derivative)(x);

            if df == 0.0 || !df.is_finite() {
                return Err(MertonError::NumericalDomain(format!(
                    "Newton-Raphson derivative {df} at iterate {x}"
                )));
            }

            x -= f / df;
        }

        Err(MertonError::ConvergenceFailure {
            iterations: Self::MAX_ITERATIONS,
            last_iterate: x,
        })
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
