// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// merton: A Rust library for Black-Scholes-Merton option pricing.
// Copyright (C) 2024-2026 https://github.com/merton-rs
// Dual licensed under Apache 2.0 and MIT.
// See:
//      - LICENSE-APACHE.md
//      - LICENSE-MIT.md
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

//! Forward-mode dual numbers.
//!
//! [`Dual64`] is a truncated Taylor jet: a value plus its first, second and
//! third derivative coefficients with respect to a single seeded input.
//! Every operator applies the chain rule (Faà di Bruno up to order three),
//! so evaluating a formula at `Dual64::variable(x)` yields the formula's
//! value and its first three derivatives at `x` in one pass.
//!
//! Third order is carried because the QD+ boundary Newton and the
//! second-order greeks (gamma) both sit one differentiation below it.

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// IMPORTS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

use crate::carrier::Carrier;
use errorfunctions::RealErrorFunctions;
use std::fmt::Display;
use std::ops::{Add, Div, Mul, Neg, Sub};

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// STRUCT AND IMPLEMENTATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// A third-order forward-mode dual number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dual64 {
    /// The value of the expression.
    pub real: f64,
    /// First, second and third derivative coefficients with respect to
    /// the seeded input.
    pub grad: [f64; 3],
}

impl Dual64 {
    /// A constant: no sensitivity to the seeded input.
    #[must_use]
    #[inline]
    pub const fn constant(value: f64) -> Self {
        Self {
            real: value,
            grad: [0.0; 3],
        }
    }

    /// The seeded independent variable (`dx/dx = 1`).
    #[must_use]
    #[inline]
    pub const fn variable(value: f64) -> Self {
        Self {
            real: value,
            grad: [1.0, 0.0, 0.0],
        }
    }

    /// The value of the expression.
    #[must_use]
    #[inline]
    pub const fn value(&self) -> f64 {
        self.real
    }

    /// First derivative with respect to the seeded input.
    #[must_use]
    #[inline]
    pub const fn first(&self) -> f64 {
        self.grad[0]
    }

    /// Second derivative with respect to the seeded input.
    #[must_use]
    #[inline]
    pub const fn second(&self) -> f64 {
        self.grad[1]
    }

    /// Third derivative with respect to the seeded input.
    #[must_use]
    #[inline]
    pub const fn third(&self) -> f64 {
        self.grad[2]
    }

    /// Chain rule for a unary function with scalar derivatives
    /// `f0 = f(u)`, `f1 = f'(u)`, `f2 = f''(u)`, `f3 = f'''(u)`
    /// evaluated at the value of `self` (Faà di Bruno to order three).
    #[inline]
    fn chain(self, f0: f64, f1: f64, f2: f64, f3: f64) -> Self {
        let [u1, u2, u3] = self.grad;
        Self {
            real: f0,
            grad: [
                f1 * u1,
                f2 * u1 * u1 + f1 * u2,
                f3 * u1 * u1 * u1 + 3.0 * f2 * u1 * u2 + f1 * u3,
            ],
        }
    }
}

/// Implement formatting for the `Dual64` struct.
impl Display for Dual64 {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} + {:?}ε", self.real, self.grad)
    }
}

impl PartialOrd for Dual64 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.real.partial_cmp(&other.real)
    }
}

impl PartialEq<f64> for Dual64 {
    #[inline]
    fn eq(&self, other: &f64) -> bool {
        self.real == *other
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// OVERLOADING: STANDARD MATH OPERATORS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// Dual64 + Dual64
impl Add<Dual64> for Dual64 {
    type Output = Dual64;

    #[inline]
    fn add(self, other: Dual64) -> Self::Output {
        let [u1, u2, u3] = self.grad;
        let [v1, v2, v3] = other.grad;
        Dual64 {
            real: self.real + other.real,
            grad: [u1 + v1, u2 + v2, u3 + v3],
        }
    }
}

/// Dual64 + f64
impl Add<f64> for Dual64 {
    type Output = Dual64;

    #[inline]
    fn add(self, other: f64) -> Self::Output {
        Dual64 {
            real: self.real + other,
            grad: self.grad,
        }
    }
}

/// f64 + Dual64
impl Add<Dual64> for f64 {
    type Output = Dual64;

    #[inline]
    fn add(self, other: Dual64) -> Self::Output {
        other + self
    }
}

/// Dual64 - Dual64
impl Sub<Dual64> for Dual64 {
    type Output = Dual64;

    #[inline]
    fn sub(self, other: Dual64) -> Self::Output {
        self + (-other)
    }
}

/// Dual64 - f64
impl Sub<f64> for Dual64 {
    type Output = Dual64;

    #[inline]
    fn sub(self, other: f64) -> Self::Output {
        Dual64 {
            real: self.real - other,
            grad: self.grad,
        }
    }
}

/// f64 - Dual64
impl Sub<Dual64> for f64 {
    type Output = Dual64;

    #[inline]
    fn sub(self, other: Dual64) -> Self::Output {
        -other + self
    }
}

/// Dual64 * Dual64 (Leibniz to order three).
impl Mul<Dual64> for Dual64 {
    type Output = Dual64;

    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let x = Dual64::variable(3.0);
    /// let y = x * x * x;
    ///
    /// assert_eq!(y.value(), 27.0);
    /// assert_eq!(y.first(), 27.0);   // 3x^2
    /// assert_eq!(y.second(), 18.0);  // 6x
    /// assert_eq!(y.third(), 6.0);
    /// ```
    #[inline]
    fn mul(self, other: Dual64) -> Self::Output {
        let [u1, u2, u3] = self.grad;
        let [v1, v2, v3] = other.grad;
        Dual64 {
            real: self.real * other.real,
            grad: [
                u1 * other.real + self.real * v1,
                u2 * other.real + 2.0 * u1 * v1 + self.real * v2,
                u3 * other.real + 3.0 * u2 * v1 + 3.0 * u1 * v2 + self.real * v3,
            ],
        }
    }
}

/// Dual64 * f64
impl Mul<f64> for Dual64 {
    type Output = Dual64;

    #[inline]
    fn mul(self, other: f64) -> Self::Output {
        let [u1, u2, u3] = self.grad;
        Dual64 {
            real: self.real * other,
            grad: [u1 * other, u2 * other, u3 * other],
        }
    }
}

/// f64 * Dual64
impl Mul<Dual64> for f64 {
    type Output = Dual64;

    #[inline]
    fn mul(self, other: Dual64) -> Self::Output {
        other * self
    }
}

/// Dual64 / Dual64
impl Div<Dual64> for Dual64 {
    type Output = Dual64;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: Dual64) -> Self::Output {
        self * other.recip()
    }
}

/// Dual64 / f64
impl Div<f64> for Dual64 {
    type Output = Dual64;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: f64) -> Self::Output {
        self * other.recip()
    }
}

/// f64 / Dual64
impl Div<Dual64> for f64 {
    type Output = Dual64;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, other: Dual64) -> Self::Output {
        other.recip() * self
    }
}

impl Neg for Dual64 {
    type Output = Dual64;

    #[inline]
    fn neg(self) -> Self::Output {
        let [u1, u2, u3] = self.grad;
        Dual64 {
            real: -self.real,
            grad: [-u1, -u2, -u3],
        }
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// OVERLOADING: PRIMITIVE FUNCTIONS
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

impl Dual64 {
    /// Exponential function.
    /// d/dx exp(x) = exp(x)
    ///
    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let x = Dual64::variable(1.0);
    /// let y = x.exp();
    ///
    /// assert!((y.first() - std::f64::consts::E).abs() <= 1e-15);
    /// assert!((y.third() - std::f64::consts::E).abs() <= 1e-15);
    /// ```
    #[must_use]
    #[inline]
    pub fn exp(self) -> Self {
        let e = self.real.exp();
        self.chain(e, e, e, e)
    }

    /// Natural logarithm.
    /// d/dx ln(x) = 1 / x
    #[must_use]
    #[inline]
    pub fn ln(self) -> Self {
        let x = self.real;
        self.chain(x.ln(), x.recip(), -(x * x).recip(), 2.0 / (x * x * x))
    }

    /// Square root.
    /// d/dx sqrt(x) = 1 / (2 sqrt(x))
    #[must_use]
    #[inline]
    pub fn sqrt(self) -> Self {
        let x = self.real;
        let s = x.sqrt();
        self.chain(s, 0.5 / s, -0.25 / (x * s), 0.375 / (x * x * s))
    }

    /// Reciprocal.
    /// d/dx 1/x = -1 / x^2
    #[must_use]
    #[inline]
    pub fn recip(self) -> Self {
        let x = self.real;
        let x2 = x * x;
        self.chain(x.recip(), -x2.recip(), 2.0 / (x2 * x), -6.0 / (x2 * x2))
    }

    /// Real power.
    /// d/dx x^a = a x^(a-1)
    #[must_use]
    #[inline]
    pub fn powf(self, a: f64) -> Self {
        let x = self.real;
        self.chain(
            x.powf(a),
            a * x.powf(a - 1.0),
            a * (a - 1.0) * x.powf(a - 2.0),
            a * (a - 1.0) * (a - 2.0) * x.powf(a - 3.0),
        )
    }

    /// Integer power.
    #[must_use]
    #[inline]
    pub fn powi(self, n: i32) -> Self {
        self.powf(f64::from(n))
    }

    /// Error function.
    /// d/dx erf(x) = 2 exp(-x^2) / sqrt(pi)
    ///
    /// ```
    /// # use merton_autodiff::*;
    ///
    /// let x = Dual64::variable(0.0);
    /// let y = x.erf();
    ///
    /// assert_eq!(y.value(), 0.0);
    /// assert!((y.first() - std::f64::consts::FRAC_2_SQRT_PI).abs() <= 1e-15);
    /// ```
    #[must_use]
    #[inline]
    pub fn erf(self) -> Self {
        let x = self.real;
        let d = std::f64::consts::FRAC_2_SQRT_PI * (-x * x).exp();
        self.chain(
            RealErrorFunctions::erf(x),
            d,
            -2.0 * x * d,
            (4.0 * x * x - 2.0) * d,
        )
    }

    /// Absolute value function.
    /// d/dx abs(x) = sign(x)
    #[must_use]
    #[inline]
    pub fn abs(self) -> Self {
        if self.real.is_sign_negative() {
            -self
        } else {
            self
        }
    }

    /// The larger of two duals, compared by value. Derivatives follow the
    /// selected branch.
    #[must_use]
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.real >= other.real {
            self
        } else {
            other
        }
    }
}

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// CARRIER IMPLEMENTATION
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

/// The forward-mode carrier.
impl Carrier for Dual64 {
    #[inline]
    fn value(self) -> f64 {
        self.real
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
