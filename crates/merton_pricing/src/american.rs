// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Early-exercise facts shared by the CRR and QD+ engines.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::params::PricingParameters;
use merton_instruments::TypeFlag;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// FUNCTIONS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Whether early exercise is never optimal, in which case the American
/// premium collapses to the European one.
///
/// - Call: `q <= 0` and `q <= r` (no dividend to capture).
/// - Put: `r <= 0` and `r <= q` (no interest to earn on the strike).
#[must_use]
pub fn never_optimal_exercise(p: &PricingParameters<f64>, flag: TypeFlag) -> bool {
    match flag {
        TypeFlag::Call => p.q <= 0.0 && p.q <= p.r,
        TypeFlag::Put => p.r <= 0.0 && p.r <= p.q,
        TypeFlag::Forward => false,
    }
}

/// The exercise boundary at maturity (`tau' = 0`).
///
/// - Call: `K` when `r <= q`, otherwise `K r / q`.
/// - Put: `K` when `r >= q`, otherwise `K r / q`.
#[must_use]
pub fn boundary_at_maturity(p: &PricingParameters<f64>, flag: TypeFlag) -> f64 {
    match flag {
        TypeFlag::Call => {
            if p.r <= p.q {
                p.K
            } else {
                p.K * p.r / p.q
            }
        }
        TypeFlag::Put => {
            if p.r >= p.q {
                p.K
            } else {
                p.K * p.r / p.q
            }
        }
        TypeFlag::Forward => p.K,
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

#[cfg(test)]
mod tests_american {
    use super::*;
    use merton_utils::assert_approx_equal;

    fn params(r: f64, q: f64) -> PricingParameters<f64> {
        PricingParameters {
            S: 100.0,
            K: 100.0,
            sigma: 0.2,
            tau: 0.5,
            r,
            q,
        }
    }

    #[test]
    fn test_never_optimal() {
        // Call on a non-dividend payer: never exercised early.
        assert!(never_optimal_exercise(&params(0.05, 0.0), TypeFlag::Call));
        assert!(!never_optimal_exercise(&params(0.01, 0.05), TypeFlag::Call));

        // Put under non-positive rates below the yield.
        assert!(never_optimal_exercise(&params(-0.01, 0.0), TypeFlag::Put));
        assert!(!never_optimal_exercise(&params(0.01, 0.05), TypeFlag::Put));
    }

    #[test]
    fn test_boundary_at_maturity() {
        assert_approx_equal!(
            boundary_at_maturity(&params(0.02, 0.01), TypeFlag::Put),
            100.0,
            1e-15
        );
        assert_approx_equal!(
            boundary_at_maturity(&params(0.01, 0.02), TypeFlag::Put),
            100.0 * 0.01 / 0.02,
            1e-12
        );
        assert_approx_equal!(
            boundary_at_maturity(&params(0.02, 0.01), TypeFlag::Call),
            100.0 * 0.02 / 0.01,
            1e-12
        );
        assert_approx_equal!(
            boundary_at_maturity(&params(0.01, 0.02), TypeFlag::Call),
            100.0,
            1e-15
        );
    }
}
