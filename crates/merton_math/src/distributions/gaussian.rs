// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Standard Gaussian distribution.
//!
//! The distribution function is expressed through the error function,
//! `Phi(x) = (1 + erf(x / sqrt(2))) / 2`, so the same code propagates
//! derivatives when evaluated over an autodiff carrier.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use merton_autodiff::Carrier;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// FUNCTIONS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Standard normal cumulative distribution function,
/// `Phi(x) = (1 + erf(x / sqrt(2))) / 2`.
#[inline]
pub fn norm_cdf<C: Carrier>(x: C) -> C {
    ((x * FRAC_1_SQRT_2).erf() + 1.0) * 0.5
}

/// Standard normal probability density function,
/// `phi(x) = exp(-x^2 / 2) / sqrt(2 pi)`.
#[inline]
pub fn norm_pdf<C: Carrier>(x: C) -> C {
    (x * x * -0.5).exp() / (2.0 * PI).sqrt()
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCT AND IMPLEMENTATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Gaussian distribution: X ~ N(mu, sigma^2)
#[derive(Clone, Copy, Debug)]
pub struct Gaussian {
    /// Mean.
    mean: f64,
    /// Standard deviation.
    std_dev: f64,
}

impl Default for Gaussian {
    /// The standard normal distribution, N(0, 1).
    #[inline]
    fn default() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }
}

impl Gaussian {
    /// New instance of a Gaussian distribution.
    ///
    /// # Panics
    ///
    /// Panics if the standard deviation is not positive.
    #[must_use]
    pub fn new(mean: f64, std_dev: f64) -> Self {
        assert!(std_dev > 0.0);

        Self { mean, std_dev }
    }

    /// Probability density function of the Gaussian distribution.
    /// # Examples
    /// ```
    /// # use merton_utils::assert_approx_equal;
    /// # use merton_math::distributions::Gaussian;
    ///
    /// let dist = Gaussian::default();
    ///
    /// assert_approx_equal!(dist.pdf(0.0), 0.3989422804014327, 1e-15);
    /// ```
    #[must_use]
    pub fn pdf(&self, x: f64) -> f64 {
        norm_pdf((x - self.mean) / self.std_dev) / self.std_dev
    }

    /// Cumulative distribution function of the Gaussian distribution.
    /// # Examples
    /// ```
    /// # use merton_utils::assert_approx_equal;
    /// # use merton_math::distributions::Gaussian;
    ///
    /// let dist = Gaussian::default();
    ///
    /// assert_approx_equal!(dist.cdf(0.0), 0.5, 1e-15);
    /// assert_approx_equal!(dist.cdf(1.96), 0.9750021048517795, 1e-12);
    /// ```
    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        norm_cdf((x - self.mean) / self.std_dev)
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

#[cfg(test)]
mod tests_gaussian {
    use super::*;
    use merton_autodiff::{Accumulate, Dual64, Gradient, Graph};
    use merton_utils::assert_approx_equal;

    #[test]
    fn test_cdf_symmetry() {
        for x in [-2.0, -0.5, 0.0, 0.7, 1.3] {
            assert_approx_equal!(norm_cdf(x) + norm_cdf(-x), 1.0, 1e-15);
        }
    }

    #[test]
    fn test_cdf_values() {
        assert_approx_equal!(norm_cdf(0.0), 0.5, 1e-15);
        assert_approx_equal!(norm_cdf(1.0), 0.841_344_746_068_542_9, 1e-12);
        assert_approx_equal!(norm_cdf(-1.0), 0.158_655_253_931_457_05, 1e-12);
    }

    #[test]
    fn test_pdf_is_cdf_derivative_forward() {
        let x = Dual64::variable(0.8);
        let c = norm_cdf(x);

        assert_approx_equal!(c.first(), norm_pdf(0.8_f64), 1e-14);
    }

    #[test]
    fn test_pdf_is_cdf_derivative_reverse() {
        let g = Graph::new();
        let x = g.var(0.8);
        let c = norm_cdf(x);

        let grad = c.accumulate();

        assert_approx_equal!(grad.wrt(&x), norm_pdf(0.8_f64), 1e-14);
    }

    #[test]
    fn test_scaled_gaussian() {
        let dist = Gaussian::new(1.0, 2.0);
        assert_approx_equal!(dist.cdf(1.0), 0.5, 1e-15);
        assert_approx_equal!(dist.pdf(1.0), 0.5 * norm_pdf(0.0_f64), 1e-15);
    }
}
