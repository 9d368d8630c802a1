// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Operator and primitive-function overloads for [`Variable`].
//!
//! Each operation pushes one vertex holding the local partial derivatives;
//! nothing else happens until the backward sweep.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::carrier::Carrier;
use crate::variable::Variable;
use crate::vertex::Arity;
use errorfunctions::RealErrorFunctions;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
/// Overload the standard addition operator (`+`).
/// d/dx x + y = 1
/// d/dy x + y = 1
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Variable<'v> + Variable<'v>
impl<'v> Add<Variable<'v>> for Variable<'v> {
    type Output = Variable<'v>;

    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let g = Graph::new();
    ///
    /// let x = g.var(5.0);
    /// let y = g.var(2.0);
    /// let z = x + y;
    ///
    /// let grad = z.accumulate();
    ///
    /// assert_eq!(z.value, 7.0);
    /// assert_eq!(grad.wrt(&x), 1.0);
    /// assert_eq!(grad.wrt(&y), 1.0);
    /// ```
    #[inline]
    fn add(self, other: Variable<'v>) -> Self::Output {
        assert!(std::ptr::eq(self.graph, other.graph));

        Variable {
            graph: self.graph,
            value: self.value + other.value,
            index: self
                .graph
                .push(Arity::Binary, &[self.index, other.index], &[1.0, 1.0]),
        }
    }
}

/// Variable<'v> + f64
impl<'v> Add<f64> for Variable<'v> {
    type Output = Variable<'v>;

    #[inline]
    fn add(self, other: f64) -> Self::Output {
        Variable {
            graph: self.graph,
            value: self.value + other,
            index: self
                .graph
                .push(Arity::Binary, &[self.index, self.index], &[1.0, 0.0]),
        }
    }
}

/// f64 + Variable<'v>
impl<'v> Add<Variable<'v>> for f64 {
    type Output = Variable<'v>;

    #[inline]
    fn add(self, other: Variable<'v>) -> Self::Output {
        other + self
    }
}

/// AddAssign: Variable<'v> += Variable<'v>
impl<'v> AddAssign<Variable<'v>> for Variable<'v> {
    #[inline]
    fn add_assign(&mut self, other: Variable<'v>) {
        assert!(std::ptr::eq(self.graph, other.graph));

        *self = *self + other;
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
/// Overload the standard subtraction operator (`-`).
/// d/dx x - y = 1
/// d/dy x - y = -1
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Variable<'v> - Variable<'v>
impl<'v> Sub<Variable<'v>> for Variable<'v> {
    type Output = Variable<'v>;

    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let g = Graph::new();
    ///
    /// let x = g.var(5.0);
    /// let y = g.var(2.0);
    /// let z = x - y;
    ///
    /// let grad = z.accumulate();
    ///
    /// assert_eq!(z.value, 3.0);
    /// assert_eq!(grad.wrt(&x), 1.0);
    /// assert_eq!(grad.wrt(&y), -1.0);
    /// ```
    #[inline]
    fn sub(self, other: Variable<'v>) -> Self::Output {
        assert!(std::ptr::eq(self.graph, other.graph));

        Variable {
            graph: self.graph,
            value: self.value - other.value,
            index: self
                .graph
                .push(Arity::Binary, &[self.index, other.index], &[1.0, -1.0]),
        }
    }
}

/// Variable<'v> - f64
impl<'v> Sub<f64> for Variable<'v> {
    type Output = Variable<'v>;

    #[inline]
    fn sub(self, other: f64) -> Self::Output {
        self + (-other)
    }
}

/// f64 - Variable<'v>
impl<'v> Sub<Variable<'v>> for f64 {
    type Output = Variable<'v>;

    #[inline]
    fn sub(self, other: Variable<'v>) -> Self::Output {
        -other + self
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
/// Overload the standard multiplication operator (`*`).
/// d/dx x * y = y
/// d/dy x * y = x
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Variable<'v> * Variable<'v>
impl<'v> Mul<Variable<'v>> for Variable<'v> {
    type Output = Variable<'v>;

    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let g = Graph::new();
    ///
    /// let x = g.var(5.0);
    /// let y = g.var(2.0);
    /// let z = x * y;
    ///
    /// let grad = z.accumulate();
    ///
    /// assert_eq!(z.value, 10.0);
    /// assert_eq!(grad.wrt(&x), 2.0);
    /// assert_eq!(grad.wrt(&y), 5.0);
    /// ```
    #[inline]
    fn mul(self, other: Variable<'v>) -> Self::Output {
        assert!(std::ptr::eq(self.graph, other.graph));

        Variable {
            graph: self.graph,
            value: self.value * other.value,
            index: self.graph.push(
                Arity::Binary,
                &[self.index, other.index],
                &[other.value, self.value],
            ),
        }
    }
}

/// Variable<'v> * f64
impl<'v> Mul<f64> for Variable<'v> {
    type Output = Variable<'v>;

    #[inline]
    fn mul(self, other: f64) -> Self::Output {
        Variable {
            graph: self.graph,
            value: self.value * other,
            index: self
                .graph
                .push(Arity::Binary, &[self.index, self.index], &[other, 0.0]),
        }
    }
}

/// f64 * Variable<'v>
impl<'v> Mul<Variable<'v>> for f64 {
    type Output = Variable<'v>;

    #[inline]
    fn mul(self, other: Variable<'v>) -> Self::Output {
        other * self
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
/// Overload the standard division operator (`/`).
/// d/dx x/y = 1/y
/// d/dy x/y = -x/y^2
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Variable<'v> / Variable<'v>
impl<'v> Div<Variable<'v>> for Variable<'v> {
    type Output = Variable<'v>;

    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let g = Graph::new();
    ///
    /// let x = g.var(5.0);
    /// let y = g.var(2.0);
    /// let z = x / y;
    ///
    /// let grad = z.accumulate();
    ///
    /// assert_eq!(z.value, 5.0 / 2.0);
    /// assert_eq!(grad.wrt(&x), 1.0 / 2.0);
    /// assert_eq!(grad.wrt(&y), -5.0 / (2.0 * 2.0));
    /// ```
    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: Variable<'v>) -> Self::Output {
        assert!(std::ptr::eq(self.graph, other.graph));

        self * other.recip()
    }
}

/// Variable<'v> / f64
impl<'v> Div<f64> for Variable<'v> {
    type Output = Variable<'v>;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: f64) -> Self::Output {
        self * other.recip()
    }
}

/// f64 / Variable<'v>
impl<'v> Div<Variable<'v>> for f64 {
    type Output = Variable<'v>;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: Variable<'v>) -> Self::Output {
        other.recip() * self
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// OVERLOADING: STANDARD MATH OPERATORS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

impl<'v> Neg for Variable<'v> {
    type Output = Variable<'v>;

    #[inline]
    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// OVERLOADING: PRIMITIVE FUNCTIONS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

impl<'v> Variable<'v> {
    /// Reciprocal function.
    /// d/dx 1/x = -1/x^2
    #[must_use]
    #[inline]
    pub fn recip(self) -> Self {
        Variable {
            graph: self.graph,
            value: self.value.recip(),
            index: self.graph.push(
                Arity::Unary,
                &[self.index],
                &[-(self.value * self.value).recip()],
            ),
        }
    }

    /// Exponential function.
    /// d/dx exp(x) = exp(x)
    ///
    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let g = Graph::new();
    ///
    /// let x = g.var(1.0);
    /// let z = x.exp();
    /// let grad = z.accumulate();
    ///
    /// assert!((z.value - std::f64::consts::E).abs() <= 1e-15);
    /// assert!((grad.wrt(&x) - std::f64::consts::E).abs() <= 1e-15);
    /// ```
    #[must_use]
    #[inline]
    pub fn exp(self) -> Self {
        Variable {
            graph: self.graph,
            value: self.value.exp(),
            index: self
                .graph
                .push(Arity::Unary, &[self.index], &[self.value.exp()]),
        }
    }

    /// Natural logarithm.
    /// d/dx ln(x) = 1/x
    ///
    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let g = Graph::new();
    ///
    /// let x = g.var(std::f64::consts::E);
    /// let z = x.ln();
    /// let grad = z.accumulate();
    ///
    /// assert!((z.value - 1.0).abs() <= 1e-15);
    /// assert!((grad.wrt(&x) - 1.0 / std::f64::consts::E).abs() <= 1e-15);
    /// ```
    #[must_use]
    #[inline]
    pub fn ln(self) -> Self {
        Variable {
            graph: self.graph,
            value: self.value.ln(),
            index: self
                .graph
                .push(Arity::Unary, &[self.index], &[self.value.recip()]),
        }
    }

    /// Square root function.
    /// d/dx sqrt(x) = 1 / (2 sqrt(x))
    #[must_use]
    #[inline]
    pub fn sqrt(self) -> Self {
        Variable {
            graph: self.graph,
            value: self.value.sqrt(),
            index: self.graph.push(
                Arity::Unary,
                &[self.index],
                &[(2.0 * self.value.sqrt()).recip()],
            ),
        }
    }

    /// Integer power function.
    /// d/dx x^n = n x^(n-1)
    #[must_use]
    #[inline]
    pub fn powi(self, n: i32) -> Self {
        Variable {
            graph: self.graph,
            value: self.value.powi(n),
            index: self.graph.push(
                Arity::Unary,
                &[self.index],
                &[f64::from(n) * self.value.powi(n - 1)],
            ),
        }
    }

    /// Real power function.
    /// d/dx x^a = a x^(a-1)
    #[must_use]
    #[inline]
    pub fn powf(self, a: f64) -> Self {
        Variable {
            graph: self.graph,
            value: self.value.powf(a),
            index: self
                .graph
                .push(Arity::Unary, &[self.index], &[a * self.value.powf(a - 1.0)]),
        }
    }

    /// Error function.
    /// d/dx erf(x) = 2 exp(-x^2) / sqrt(pi)
    ///
    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let g = Graph::new();
    ///
    /// let x = g.var(0.0);
    /// let z = x.erf();
    /// let grad = z.accumulate();
    ///
    /// assert_eq!(z.value, 0.0);
    /// assert_eq!(grad.wrt(&x), std::f64::consts::FRAC_2_SQRT_PI);
    /// ```
    #[must_use]
    #[inline]
    pub fn erf(self) -> Self {
        Variable {
            graph: self.graph,
            value: RealErrorFunctions::erf(self.value),
            index: self.graph.push(
                Arity::Unary,
                &[self.index],
                &[std::f64::consts::FRAC_2_SQRT_PI * (-self.value * self.value).exp()],
            ),
        }
    }

    /// Absolute value function.
    /// d/dx abs(x) = sign(x)
    #[must_use]
    #[inline]
    pub fn abs(self) -> Self {
        Variable {
            graph: self.graph,
            value: self.value.abs(),
            index: self
                .graph
                .push(Arity::Unary, &[self.index], &[self.value.signum()]),
        }
    }

    /// The larger of two variables, compared by value. The derivative
    /// flows through the selected branch.
    #[must_use]
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.value >= other.value {
            self
        } else {
            other
        }
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// CARRIER IMPLEMENTATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// The reverse-mode carrier.
impl<'v> Carrier for Variable<'v> {
    #[inline]
    fn value(self) -> f64 {
        self.value
    }

    #[inline]
    fn exp(self) -> Self {
        self.exp()
    }

    #[inline]
    fn ln(self) -> Self {
        self.ln()
    }

    #[inline]
    fn sqrt(self) -> Self {
        self.sqrt()
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        self.powi(n)
    }

    #[inline]
    fn powf(self, exponent: f64) -> Self {
        self.powf(exponent)
    }

    #[inline]
    fn erf(self) -> Self {
        self.erf()
    }

    #[inline]
    fn abs(self) -> Self {
        self.abs()
    }

    #[inline]
    fn recip(self) -> Self {
        self.recip()
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        self.max(other)
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// UNIT TESTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

#[cfg(test)]
mod tests_overload {
    use crate::*;
    use merton_utils::assert_approx_equal;

    #[test]
    fn test_product_rule() {
        let g = Graph::new();

        let x = g.var(3.0);
        let y = g.var(4.0);
        let z = x * y + x;

        let grad = z.accumulate();

        assert_approx_equal!(z.value, 15.0, 1e-15);
        assert_approx_equal!(grad.wrt(&x), 5.0, 1e-15);
        assert_approx_equal!(grad.wrt(&y), 3.0, 1e-15);
    }

    #[test]
    fn test_quotient_rule() {
        let g = Graph::new();

        let x = g.var(1.0);
        let y = g.var(2.0);
        let z = (x * y) / (x + y);

        let grad = z.accumulate();

        // dz/dx = (y (x + y) - x y) / (x + y)^2 = y^2 / (x + y)^2
        assert_approx_equal!(grad.wrt(&x), 4.0 / 9.0, 1e-15);
        assert_approx_equal!(grad.wrt(&y), 1.0 / 9.0, 1e-15);
    }

    #[test]
    fn test_chain_rule() {
        let g = Graph::new();

        let x = g.var(0.5);
        let z = (x * x).exp().ln().sqrt();

        let grad = z.accumulate();

        // z = sqrt(x^2) = x for positive x, so dz/dx = 1.
        assert_approx_equal!(z.value, 0.5, 1e-15);
        assert_approx_equal!(grad.wrt(&x), 1.0, 1e-14);
    }

    #[test]
    fn test_mixed_f64_operands() {
        let g = Graph::new();

        let x = g.var(2.0);
        let z = 1.0 - (3.0 * x + 1.0) / 2.0;

        let grad = z.accumulate();

        assert_approx_equal!(z.value, -2.5, 1e-15);
        assert_approx_equal!(grad.wrt(&x), -1.5, 1e-15);
    }

    #[test]
    fn test_erf_gradient() {
        let g = Graph::new();

        let x = g.var(0.5);
        let z = x.erf();

        let grad = z.accumulate();

        let expected = std::f64::consts::FRAC_2_SQRT_PI * (-0.25_f64).exp();
        assert_approx_equal!(grad.wrt(&x), expected, 1e-15);
    }

    #[test]
    fn test_max_selects_branch() {
        let g = Graph::new();

        let x = g.var(3.0);
        let y = g.var(1.0);
        let z = (x - y).max((x - y) * 0.0);

        let grad = z.accumulate();

        assert_approx_equal!(z.value, 2.0, 1e-15);
        assert_approx_equal!(grad.wrt(&x), 1.0, 1e-15);
        assert_approx_equal!(grad.wrt(&y), -1.0, 1e-15);
    }
}
