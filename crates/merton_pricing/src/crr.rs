// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! The Cox-Ross-Rubinstein binomial lattice engine.
//!
//! Two triangular trees: an underlying-spot tree and a premium tree whose
//! nodes carry `(value, exercised)` pairs. The premium is filled by
//! backward induction with optional early exercise; rows are strictly
//! sequential, the work within a row is handed to rayon.
//!
//! With `extra_steps > 0` the tree root is shifted `extra_steps` rows
//! earlier in time, so the reported price sits at the effective root
//! `(extra_steps, extra_steps / 2)` while the lattice keeps pricing
//! through it. This smooths the reconstructed American exercise boundary
//! near maturity.
//!
//! Delta, gamma and theta are read off the tree at the effective root;
//! vega, rho and psi are bumped revaluations (multiply the parameter by
//! `exp(0.01)`, or add `0.01` when it is zero, rebuild the lattice from
//! scratch and difference the prices).

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::american::{boundary_at_maturity, never_optimal_exercise};
use crate::lattice::BinomialTree;
use crate::method::{AmericanMethod, PricingMethod};
use crate::params::PricingParameters;
use merton_error::MertonError;
use merton_instruments::TypeFlag;
use rayon::prelude::*;
use std::fmt::Display;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCTS AND IMPLEMENTATIONS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// One node of the premium tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct LatticeNode {
    /// The premium at this node.
    pub value: f64,
    /// Whether immediate exercise beat continuation here.
    pub exercised: bool,
}

impl Display for LatticeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}[{}]", self.value, u8::from(self.exercised))
    }
}

/// The two-tree CRR lattice for one instrument binding.
pub(crate) struct CrrLattice {
    pub(crate) params: PricingParameters<f64>,
    pub(crate) flag: TypeFlag,
    /// Total number of tree steps, `steps + extra_steps`.
    levels: usize,
    /// Root shift (`extra_steps`).
    shift: usize,
    dt: f64,
    prob: f64,
    discount: f64,
    underlying: BinomialTree<f64>,
    premium: BinomialTree<LatticeNode>,
}

impl CrrLattice {
    /// Build the tree geometry and the underlying lattice.
    ///
    /// # Errors
    ///
    /// [`MertonError::LatticeInfeasible`] when the risk-neutral up-move
    /// probability leaves `(0, 1)`.
    pub(crate) fn new(
        params: PricingParameters<f64>,
        flag: TypeFlag,
        levels: usize,
        shift: usize,
    ) -> Result<Self, MertonError> {
        let dt = params.tau / (levels - shift) as f64;
        let up = (params.sigma * dt.sqrt()).exp();
        let down = up.recip();
        let prob = (((params.r - params.q) * dt).exp() - down) / (up - down);
        let discount = (-params.r * dt).exp();

        if !(prob > 0.0 && prob < 1.0) {
            return Err(MertonError::LatticeInfeasible { probability: prob });
        }

        let mut lattice = Self {
            params,
            flag,
            levels,
            shift,
            dt,
            prob,
            discount,
            underlying: BinomialTree::new(levels),
            premium: BinomialTree::new(levels),
        };

        lattice.generate_underlying(up, down);

        Ok(lattice)
    }

    /// Fill the underlying tree, `U(t, i) = S u^(t-i) d^i`, row by row.
    fn generate_underlying(&mut self, up: f64, down: f64) {
        let spot = self.params.S;
        self.underlying.set(0, 0, spot);

        for t in 1..=self.levels {
            self.underlying
                .row_mut(t)
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, node)| {
                    *node = spot * up.powi((t - i) as i32) * down.powi(i as i32);
                });
        }
    }

    /// Backward induction. Fills the premium tree and, when early
    /// exercise is allowed, reconstructs the per-row exercise boundary
    /// (empty vector otherwise).
    pub(crate) fn solve<P>(&mut self, payoff: &P, early_exercise: bool) -> Vec<f64>
    where
        P: Fn(f64) -> f64 + Sync + ?Sized,
    {
        let levels = self.levels;
        let prob = self.prob;
        let discount = self.discount;

        // Terminal row: the payoff itself, never flagged as exercised.
        {
            let terminal = self.underlying.row(levels);
            self.premium
                .row_mut(levels)
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, node)| {
                    *node = LatticeNode {
                        value: payoff(terminal[i]),
                        exercised: false,
                    };
                });
        }

        let mut boundary = vec![0.0_f64; levels + 1];

        for t in (0..levels).rev() {
            let spots = self.underlying.row(t);
            let (row, next) = self.premium.backward_pair(t);

            row.par_iter_mut().enumerate().for_each(|(i, node)| {
                let continuation =
                    (prob * next[i].value + (1.0 - prob) * next[i + 1].value) * discount;

                *node = if early_exercise {
                    let exercise = payoff(spots[i]);
                    if exercise > continuation {
                        LatticeNode {
                            value: exercise,
                            exercised: true,
                        }
                    } else {
                        LatticeNode {
                            value: continuation,
                            exercised: false,
                        }
                    }
                } else {
                    LatticeNode {
                        value: continuation,
                        exercised: false,
                    }
                };
            });

            if early_exercise {
                // Rows with no exercised node get the discounted successor;
                // callers must treat those values as approximate.
                boundary[t] = self
                    .critical_spot(t, payoff)
                    .unwrap_or(boundary[t + 1] * discount);
            }
        }

        if early_exercise {
            boundary
        } else {
            Vec::new()
        }
    }

    /// The critical spot of row `t` from the exercise flags: the weighted
    /// interpolation of Basso, Nardon and Pianca between the last held and
    /// first exercised nodes.
    fn critical_spot<P>(&self, t: usize, payoff: &P) -> Option<f64>
    where
        P: Fn(f64) -> f64 + Sync + ?Sized,
    {
        let row = self.premium.row(t);

        match self.flag {
            TypeFlag::Put => {
                let b = row.iter().position(|node| node.exercised)?;
                if b == 0 {
                    return Some(*self.underlying.node(t, 0));
                }
                Some(self.interpolated_boundary(t, b, b - 1, payoff))
            }
            TypeFlag::Call => {
                let b = row.iter().rposition(|node| node.exercised)?;
                if b == 0 {
                    return Some(*self.underlying.node(t, 0));
                }
                if b >= t {
                    return None;
                }
                Some(self.interpolated_boundary(t, b, b + 1, payoff))
            }
            TypeFlag::Forward => None,
        }
    }

    fn interpolated_boundary<P>(&self, t: usize, b: usize, neighbour: usize, payoff: &P) -> f64
    where
        P: Fn(f64) -> f64 + Sync + ?Sized,
    {
        let x = *self.underlying.node(t, b);
        let x_n = *self.underlying.node(t, neighbour);
        let v = self.premium.node(t, b).value;
        let v_n = self.premium.node(t, neighbour).value;

        let den = v_n - v + x_n - x;
        let w1 = (v_n - payoff(x_n)) / den;
        let w2 = (payoff(x) - v) / den;

        w1 * x + w2 * x_n
    }

    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    // Reads at the effective root (extra_steps, extra_steps / 2):
    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

    fn pt(&self, t: usize, i: usize) -> f64 {
        self.premium.node(t + self.shift, i + self.shift / 2).value
    }

    fn ut(&self, t: usize, i: usize) -> f64 {
        *self.underlying.node(t + self.shift, i + self.shift / 2)
    }

    pub(crate) fn price(&self) -> f64 {
        self.pt(0, 0)
    }

    pub(crate) fn delta(&self) -> f64 {
        (self.pt(1, 0) - self.pt(1, 1)) / (self.ut(1, 0) - self.ut(1, 1))
    }

    pub(crate) fn gamma(&self) -> f64 {
        if self.levels - self.shift < 2 {
            return f64::NAN;
        }

        let d_up = (self.pt(2, 0) - self.pt(2, 1)) / (self.ut(2, 0) - self.ut(2, 1));
        let d_down = (self.pt(2, 1) - self.pt(2, 2)) / (self.ut(2, 1) - self.ut(2, 2));

        (d_up - d_down) / ((self.ut(2, 0) - self.ut(2, 2)) / 2.0)
    }

    /// Central time difference through the recombining node `(2, 1)`,
    /// which carries the root spot two steps closer to maturity. The
    /// quantity is already the time-decay theta, `-dPrice/dtau`.
    pub(crate) fn theta(&self) -> f64 {
        if self.levels - self.shift < 2 {
            return f64::NAN;
        }

        (self.pt(2, 1) - self.pt(0, 0)) / (2.0 * self.dt)
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// PRICING HANDLE
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// CRR pricing handle: the solved lattice plus the captured payoff.
pub struct CrrPricing {
    lattice: CrrLattice,
    payoff: Box<dyn Fn(f64) -> f64 + Send + Sync>,
    /// American only: per-row boundary, `extra_steps` prefix discarded.
    boundary: Option<Vec<f64>>,
    /// Steps excluding `extra_steps`.
    steps: usize,
}

impl CrrPricing {
    /// Price a European payoff (no root shift).
    pub(crate) fn european(
        params: PricingParameters<f64>,
        flag: TypeFlag,
        steps: usize,
    ) -> Result<Self, MertonError> {
        let mut lattice = CrrLattice::new(params, flag, steps, 0)?;
        let payoff = capture_payoff(flag, params.K);

        lattice.solve(&*payoff, false);

        Ok(Self {
            lattice,
            payoff,
            boundary: None,
            steps,
        })
    }

    /// Price an American payoff, shifting the root by `extra_steps`.
    pub(crate) fn american(
        params: PricingParameters<f64>,
        flag: TypeFlag,
        steps: usize,
        extra_steps: usize,
    ) -> Result<Self, MertonError> {
        let mut lattice = CrrLattice::new(params, flag, steps + extra_steps, extra_steps)?;
        let payoff = capture_payoff(flag, params.K);

        let mut boundary = lattice.solve(&*payoff, true);
        boundary.drain(..extra_steps);

        Ok(Self {
            lattice,
            payoff,
            boundary: Some(boundary),
            steps,
        })
    }

    /// Forward-difference the root price against a rebuilt, bumped lattice.
    fn bumped_difference(&self, bumped: PricingParameters<f64>, dx: f64) -> f64 {
        match CrrLattice::new(bumped, self.lattice.flag, self.steps, 0) {
            Ok(mut lattice) => {
                lattice.solve(&*self.payoff, self.boundary.is_some());
                (lattice.price() - self.price()) / dx
            }
            Err(error) => {
                log::warn!("bumped lattice is infeasible: {error}");
                f64::NAN
            }
        }
    }
}

/// Multiplicative bump in the parameter's own units; additive when the
/// parameter is zero.
fn bump(value: f64) -> f64 {
    if value != 0.0 {
        value * 0.01_f64.exp()
    } else {
        value + 0.01
    }
}

/// Capture the payoff function once; the inner loops call it without any
/// further dispatch.
fn capture_payoff(flag: TypeFlag, strike: f64) -> Box<dyn Fn(f64) -> f64 + Send + Sync> {
    Box::new(move |x| flag.payoff(strike, x))
}

impl PricingMethod for CrrPricing {
    fn price(&self) -> f64 {
        self.lattice.price()
    }

    fn delta(&self) -> f64 {
        self.lattice.delta()
    }

    fn gamma(&self) -> f64 {
        self.lattice.gamma()
    }

    fn vega(&self) -> f64 {
        let mut bumped = self.lattice.params;
        bumped.sigma = bump(bumped.sigma);

        self.bumped_difference(bumped, bumped.sigma - self.lattice.params.sigma)
    }

    fn theta(&self) -> f64 {
        self.lattice.theta()
    }

    fn rho(&self) -> f64 {
        let mut bumped = self.lattice.params;
        bumped.r = bump(bumped.r);

        self.bumped_difference(bumped, bumped.r - self.lattice.params.r)
    }

    fn psi(&self) -> f64 {
        let mut bumped = self.lattice.params;
        bumped.q = bump(bumped.q);

        self.bumped_difference(bumped, bumped.q - self.lattice.params.q)
    }
}

impl AmericanMethod for CrrPricing {
    fn exercise_boundary(&self, tau_prime: f64) -> f64 {
        let params = &self.lattice.params;

        if !(0.0..=params.tau).contains(&tau_prime) {
            return f64::NAN;
        }

        if never_optimal_exercise(params, self.lattice.flag) {
            return match self.lattice.flag {
                TypeFlag::Call => f64::INFINITY,
                _ => 0.0,
            };
        }

        if tau_prime == 0.0 {
            return boundary_at_maturity(params, self.lattice.flag);
        }

        let Some(boundary) = &self.boundary else {
            return f64::NAN;
        };

        let index = (self.steps as f64 * (1.0 - tau_prime / params.tau)).round() as usize;

        boundary[index.min(self.steps)]
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

#[cfg(test)]
mod tests_crr {
    use super::*;
    use crate::kernels;
    use merton_utils::assert_approx_equal;

    fn params() -> PricingParameters<f64> {
        PricingParameters {
            S: 100.0,
            K: 100.0,
            sigma: 0.20,
            tau: 0.5,
            r: 0.01,
            q: 0.05,
        }
    }

    #[test]
    fn test_underlying_tree_recombines() {
        let lattice = CrrLattice::new(params(), TypeFlag::Call, 4, 0).unwrap();

        // u d = 1, so the middle node of every even row is the spot.
        assert_approx_equal!(lattice.ut(2, 1), 100.0, 1e-10);
        assert_approx_equal!(lattice.ut(4, 2), 100.0, 1e-10);
    }

    #[test]
    fn test_european_converges_to_analytic() {
        let mut lattice = CrrLattice::new(params(), TypeFlag::Call, 500, 0).unwrap();
        lattice.solve(&|x: f64| TypeFlag::Call.payoff(100.0, x), false);

        assert_approx_equal!(lattice.price(), kernels::european_call(&params()), 2e-2);
    }

    #[test]
    fn test_american_put_dominates_european() {
        let p = params();

        let mut european = CrrLattice::new(p, TypeFlag::Put, 200, 0).unwrap();
        european.solve(&|x: f64| TypeFlag::Put.payoff(100.0, x), false);

        let mut american = CrrLattice::new(p, TypeFlag::Put, 200, 0).unwrap();
        let boundary = american.solve(&|x: f64| TypeFlag::Put.payoff(100.0, x), true);

        assert!(american.price() >= european.price());
        assert_eq!(boundary.len(), 201);
    }

    #[test]
    fn test_infeasible_lattice_is_rejected() {
        let p = PricingParameters {
            S: 100.0,
            K: 100.0,
            sigma: 0.01,
            tau: 1.0,
            r: 0.5,
            q: 0.0,
        };

        assert!(matches!(
            CrrLattice::new(p, TypeFlag::Call, 1, 0),
            Err(MertonError::LatticeInfeasible { .. })
        ));
    }

    #[test]
    fn test_boundary_is_below_strike_for_put() {
        let handle = CrrPricing::american(params(), TypeFlag::Put, 200, 0).unwrap();

        for tau_prime in [0.1, 0.2, 0.3, 0.4] {
            let boundary = handle.exercise_boundary(tau_prime);
            assert!(boundary > 0.0);
            assert!(boundary <= 100.0);
        }
    }

    #[test]
    fn test_boundary_outside_range_is_nan() {
        let handle = CrrPricing::american(params(), TypeFlag::Put, 50, 0).unwrap();

        assert!(handle.exercise_boundary(-0.1).is_nan());
        assert!(handle.exercise_boundary(0.6).is_nan());
    }
}
