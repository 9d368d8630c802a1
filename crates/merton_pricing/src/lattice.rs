// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Triangular storage for recombining binomial trees.
//!
//! Row `t` holds the `t + 1` nodes reachable after `t` moves. Rows are
//! independent contiguous slices so a row fill can be handed to rayon
//! while the previous row is read immutably.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use std::fmt::Display;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCT AND IMPLEMENTATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// A triangular array indexed by `(t, i)` with `t` in `[0, levels]` and
/// `i` in `[0, t]`.
#[derive(Clone, Debug)]
pub struct BinomialTree<T> {
    rows: Vec<Vec<T>>,
}

impl<T: Clone + Default> BinomialTree<T> {
    /// Allocate a tree with rows `0..=levels`.
    #[must_use]
    pub fn new(levels: usize) -> Self {
        let rows = (0..=levels).map(|t| vec![T::default(); t + 1]).collect();

        Self { rows }
    }
}

impl<T> BinomialTree<T> {
    /// The deepest row index.
    #[must_use]
    pub fn levels(&self) -> usize {
        self.rows.len() - 1
    }

    /// The node at `(t, i)`.
    #[must_use]
    pub fn node(&self, t: usize, i: usize) -> &T {
        &self.rows[t][i]
    }

    /// Write the node at `(t, i)`.
    pub fn set(&mut self, t: usize, i: usize, value: T) {
        self.rows[t][i] = value;
    }

    /// Row `t` as a slice.
    #[must_use]
    pub fn row(&self, t: usize) -> &[T] {
        &self.rows[t]
    }

    /// Row `t` as a mutable slice.
    pub fn row_mut(&mut self, t: usize) -> &mut [T] {
        &mut self.rows[t]
    }

    /// Row `t` mutably together with row `t + 1` immutably, for one
    /// backward-induction step.
    pub fn backward_pair(&mut self, t: usize) -> (&mut [T], &[T]) {
        let (head, tail) = self.rows.split_at_mut(t + 1);

        (head[t].as_mut_slice(), tail[0].as_slice())
    }

    /// The root node `(0, 0)`.
    #[must_use]
    pub fn root(&self) -> &T {
        &self.rows[0][0]
    }
}

/// Render the tree row by row; useful for eyeballing small trees.
impl<T: Display> Display for BinomialTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            for (i, node) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{node:.4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
